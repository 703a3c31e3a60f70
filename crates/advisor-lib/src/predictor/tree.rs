//! Decision-tree classifier exported as flat node arrays
//!
//! The artifact mirrors the array layout of a fitted CART tree: node `i`
//! splits on `feature[i]` at `threshold[i]` and routes to
//! `children_left[i]` / `children_right[i]`; leaves have no children and
//! predict the class with the largest entry in `value[i]`.

use super::Classifier;
use crate::models::{FeatureVector, FEATURE_COUNT};
use anyhow::Result;
use serde::Deserialize;

/// Child index marking a leaf node
const LEAF: i64 = -1;

#[derive(Debug, Deserialize)]
struct TreeArtifact {
    n_features: usize,
    classes: Vec<i64>,
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class_label: i64,
    },
}

/// Fitted decision tree evaluated natively
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
    classes: Vec<i64>,
}

impl DecisionTree {
    /// Parse and validate a JSON tree artifact
    pub fn from_json(bytes: &[u8]) -> Result<Self, String> {
        let artifact: TreeArtifact =
            serde_json::from_slice(bytes).map_err(|e| format!("invalid tree JSON: {}", e))?;
        Self::from_artifact(artifact)
    }

    fn from_artifact(artifact: TreeArtifact) -> Result<Self, String> {
        if artifact.n_features != FEATURE_COUNT {
            return Err(format!(
                "tree expects {} features, expected {}",
                artifact.n_features, FEATURE_COUNT
            ));
        }
        if artifact.classes.is_empty() {
            return Err("tree has no classes".to_string());
        }

        let node_count = artifact.children_left.len();
        if node_count == 0 {
            return Err("tree has no nodes".to_string());
        }
        let lengths = [
            artifact.children_right.len(),
            artifact.feature.len(),
            artifact.threshold.len(),
            artifact.value.len(),
        ];
        if lengths.iter().any(|&len| len != node_count) {
            return Err("node arrays have mismatched lengths".to_string());
        }

        let mut nodes = Vec::with_capacity(node_count);
        for i in 0..node_count {
            let left = artifact.children_left[i];
            let right = artifact.children_right[i];

            if left == LEAF {
                let class_label = leaf_label(&artifact.value[i], &artifact.classes)
                    .map_err(|e| format!("node {}: {}", i, e))?;
                nodes.push(TreeNode::Leaf { class_label });
                continue;
            }

            // Children always follow their parent, which rules out cycles
            let child = |index: i64| -> Result<usize, String> {
                usize::try_from(index)
                    .ok()
                    .filter(|&c| c > i && c < node_count)
                    .ok_or_else(|| format!("node {} has invalid child index {}", i, index))
            };
            let feature = usize::try_from(artifact.feature[i])
                .ok()
                .filter(|&f| f < artifact.n_features)
                .ok_or_else(|| {
                    format!("node {} splits on invalid feature {}", i, artifact.feature[i])
                })?;
            let threshold = artifact.threshold[i];
            if !threshold.is_finite() {
                return Err(format!("node {} has non-finite threshold", i));
            }

            nodes.push(TreeNode::Split {
                feature,
                threshold,
                left: child(left)?,
                right: child(right)?,
            });
        }

        Ok(Self {
            nodes,
            classes: artifact.classes,
        })
    }

    /// Class labels the tree can emit
    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn predict_one(&self, x: &[f64; FEATURE_COUNT]) -> i64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { class_label } => return *class_label,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    // Trees are fitted on f32 inputs
                    let value = x[*feature] as f32 as f64;
                    index = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// Label of the class with the highest weight; the first one wins ties
fn leaf_label(weights: &[f64], classes: &[i64]) -> Result<i64, String> {
    if weights.len() != classes.len() {
        return Err(format!(
            "leaf has {} class weights, expected {}",
            weights.len(),
            classes.len()
        ));
    }

    let mut best = 0;
    for (i, weight) in weights.iter().enumerate() {
        if *weight > weights[best] {
            best = i;
        }
    }
    Ok(classes[best])
}

impl Classifier for DecisionTree {
    fn classify(&self, features: &FeatureVector) -> Result<i64> {
        Ok(self.predict_one(&features.to_array()))
    }

    fn format(&self) -> &'static str {
        "decision_tree"
    }

    fn class_count(&self) -> Option<usize> {
        Some(self.classes.len())
    }
}

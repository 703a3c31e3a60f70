//! Mapping from classifier labels to fertilizer names

/// Name reported for labels outside the table
pub const UNKNOWN_FERTILIZER: &str = "Unknown Fertilizer";

/// Fertilizer names indexed by classifier label
pub const FERTILIZER_NAMES: [&str; 10] = [
    "Balanced NPK Fertilizer",
    "Compost",
    "DAP",
    "General Purpose Fertilizer",
    "Gypsum",
    "Lime",
    "Muriate of Potash",
    "Organic Fertilizer",
    "Urea",
    "Water Retaining Fertilizer",
];

/// Static lookup table for fertilizer display names
#[derive(Debug, Clone, Copy, Default)]
pub struct FertilizerNameTable;

impl FertilizerNameTable {
    pub fn new() -> Self {
        Self
    }

    /// Name for a label, `None` when the label is not in the table
    pub fn lookup(&self, label: i64) -> Option<&'static str> {
        usize::try_from(label)
            .ok()
            .and_then(|index| FERTILIZER_NAMES.get(index))
            .copied()
    }

    /// Name for a label, falling back to [`UNKNOWN_FERTILIZER`]
    pub fn name_for(&self, label: i64) -> &'static str {
        self.lookup(label).unwrap_or(UNKNOWN_FERTILIZER)
    }

    pub fn names(&self) -> &'static [&'static str] {
        &FERTILIZER_NAMES
    }
}

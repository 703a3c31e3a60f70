//! HTML pages rendered with minijinja
//!
//! Templates are compiled into the binary. Names end in `.html`, so every
//! interpolated value is HTML-escaped.

use advisor_lib::CategoryOptions;
use minijinja::{context, Environment};
use serde::Serialize;

/// Numeric form inputs, in payload key order
const NUMERIC_FIELDS: [NumericField; 7] = [
    numeric_field("Temperature", "Temperature (°C)"),
    numeric_field("Moisture", "Moisture (%)"),
    numeric_field("PH", "Soil pH"),
    numeric_field("Nitrogen", "Nitrogen"),
    numeric_field("Phosphorous", "Phosphorous"),
    numeric_field("Potassium", "Potassium"),
    numeric_field("Carbon", "Carbon (%)"),
];

#[derive(Debug, Clone, Copy, Serialize)]
struct NumericField {
    name: &'static str,
    label: &'static str,
}

const fn numeric_field(name: &'static str, label: &'static str) -> NumericField {
    NumericField { name, label }
}

/// Message on the form page when startup assets are missing
pub const ASSETS_UNAVAILABLE_MESSAGE: &str =
    "Application assets (model/encoders) failed to load. Please check server logs.";

/// Compiled page templates
pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("layout.html", include_str!("../templates/layout.html"))?;
        env.add_template("home.html", include_str!("../templates/home.html"))?;
        env.add_template("recommend.html", include_str!("../templates/recommend.html"))?;
        env.add_template("error.html", include_str!("../templates/error.html"))?;
        Ok(Self { env })
    }

    /// Landing page
    pub fn home(&self) -> Result<String, minijinja::Error> {
        self.env.get_template("home.html")?.render(context!())
    }

    /// Recommendation form with selectable soil and crop options
    pub fn recommend(&self, options: &CategoryOptions) -> Result<String, minijinja::Error> {
        let soil_options = &options.soil;
        let crop_options = &options.crop;
        self.env.get_template("recommend.html")?.render(context! {
            numeric_fields => NUMERIC_FIELDS,
            soil_options,
            crop_options,
        })
    }

    pub fn error(&self, message: &str) -> Result<String, minijinja::Error> {
        self.env
            .get_template("error.html")?
            .render(context! { message => message })
    }
}

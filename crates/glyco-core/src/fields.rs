use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// One of the eight clinical measurements the prediction service expects.
///
/// Declaration order is the display order and the key order of the
/// request payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum FieldName {
    Pregnancies,
    Glucose,
    BloodPressure,
    SkinThickness,
    Insulin,
    #[serde(rename = "BMI")]
    Bmi,
    DiabetesPedigreeFunction,
    Age,
}

impl FieldName {
    pub const COUNT: usize = 8;

    pub const ALL: [FieldName; Self::COUNT] = [
        FieldName::Pregnancies,
        FieldName::Glucose,
        FieldName::BloodPressure,
        FieldName::SkinThickness,
        FieldName::Insulin,
        FieldName::Bmi,
        FieldName::DiabetesPedigreeFunction,
        FieldName::Age,
    ];

    /// Wire name, as used for the JSON payload key.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::Pregnancies => "Pregnancies",
            FieldName::Glucose => "Glucose",
            FieldName::BloodPressure => "BloodPressure",
            FieldName::SkinThickness => "SkinThickness",
            FieldName::Insulin => "Insulin",
            FieldName::Bmi => "BMI",
            FieldName::DiabetesPedigreeFunction => "DiabetesPedigreeFunction",
            FieldName::Age => "Age",
        }
    }

    /// Human label with units.
    pub fn label(self) -> &'static str {
        match self {
            FieldName::Pregnancies => "Number of Pregnancies",
            FieldName::Glucose => "Glucose Level (mg/dL)",
            FieldName::BloodPressure => "Blood Pressure (mmHg)",
            FieldName::SkinThickness => "Skin Thickness (mm)",
            FieldName::Insulin => "Insulin Level (μU/mL)",
            FieldName::Bmi => "Body Mass Index",
            FieldName::DiabetesPedigreeFunction => "Diabetes Pedigree Function",
            FieldName::Age => "Age (years)",
        }
    }

    /// Zero-based display position.
    pub fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = CoreError;

    /// Matches the wire name case-insensitively (`bmi`, `Glucose`, `AGE`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        FieldName::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CoreError::UnknownField(needle.to_string()))
    }
}

/// Static description of one form field, for renderers.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldSpec {
    pub name: FieldName,
    pub label: String,
    pub ordinal: usize,
    pub placeholder: String,
}

pub const PLACEHOLDER: &str = "Enter value";

/// The full form schema in display order.
pub fn schema() -> &'static [FieldSpec] {
    static FIELDS: LazyLock<Vec<FieldSpec>> = LazyLock::new(|| {
        FieldName::ALL
            .iter()
            .map(|&name| FieldSpec {
                name,
                label: name.label().to_string(),
                ordinal: name.ordinal(),
                placeholder: PLACEHOLDER.to_string(),
            })
            .collect()
    });
    &FIELDS
}

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::prediction::PredictionResult;

pub const ERROR_TITLE: &str = "Analysis Error";

const HIGH_RISK_RECOMMENDATION: &str = "Based on the analysis, we recommend immediate \
consultation with a healthcare professional for comprehensive evaluation and potential \
preventive measures. Early intervention can significantly reduce diabetes risk.";

const LOW_RISK_RECOMMENDATION: &str = "Your current risk profile indicates a healthy \
metabolic state. Continue maintaining your current lifestyle with regular health \
monitoring and periodic assessments.";

const UNCLASSIFIED_RECOMMENDATION: &str = "The prediction service returned a \
classification this form does not recognise. Please review the result with a \
healthcare professional.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RiskLevel {
    Low,
    High,
    /// A prediction outside {0, 1}.
    Unclassified,
}

impl RiskLevel {
    pub fn from_prediction(prediction: i64) -> Self {
        match prediction {
            1 => RiskLevel::High,
            0 => RiskLevel::Low,
            _ => RiskLevel::Unclassified,
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            RiskLevel::High => "Elevated Risk Detected",
            RiskLevel::Low => "Low Risk Profile",
            RiskLevel::Unclassified => "Unclassified Result",
        }
    }

    pub fn classification(self) -> &'static str {
        match self {
            RiskLevel::High => "High Risk",
            RiskLevel::Low => "Low Risk",
            RiskLevel::Unclassified => "Unclassified",
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            RiskLevel::High => HIGH_RISK_RECOMMENDATION,
            RiskLevel::Low => LOW_RISK_RECOMMENDATION,
            RiskLevel::Unclassified => UNCLASSIFIED_RECOMMENDATION,
        }
    }
}

/// Display-ready form of a [`PredictionResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum DisplayModel {
    Error {
        title: String,
        message: String,
    },
    Assessment {
        level: RiskLevel,
        prediction: i64,
        headline: String,
        classification: String,
        /// `probability * 100` with one decimal and a `%` suffix.
        percentage: String,
        probability: f64,
        recommendation: String,
    },
}

impl DisplayModel {
    /// Fill fraction for a probability gauge, clamped to `[0, 1]`.
    ///
    /// The probability itself is never validated, so out-of-range or NaN
    /// values from the service still render.
    pub fn gauge_fraction(&self) -> Option<f64> {
        match self {
            DisplayModel::Assessment { probability, .. } if probability.is_nan() => Some(0.0),
            DisplayModel::Assessment { probability, .. } => Some(probability.clamp(0.0, 1.0)),
            DisplayModel::Error { .. } => None,
        }
    }
}

pub fn format_percentage(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

pub fn interpret(result: &PredictionResult) -> DisplayModel {
    match result {
        PredictionResult::Failure { message, .. } => DisplayModel::Error {
            title: ERROR_TITLE.to_string(),
            message: message.clone(),
        },
        PredictionResult::Success {
            prediction,
            probability,
        } => {
            let level = RiskLevel::from_prediction(*prediction);
            DisplayModel::Assessment {
                level,
                prediction: *prediction,
                headline: level.headline().to_string(),
                classification: level.classification().to_string(),
                percentage: format_percentage(*probability),
                probability: *probability,
                recommendation: level.recommendation().to_string(),
            }
        }
    }
}

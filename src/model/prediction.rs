//! Prediction outcome types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::employee::EmployeeRecord;

pub const LABEL_AT_RISK: &str = "Risque de départ";
pub const LABEL_STABLE: &str = "Employé stable";

/// Binary class produced by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttritionClass {
    Stable,
    AtRisk,
}

impl AttritionClass {
    pub fn as_u8(self) -> u8 {
        match self {
            AttritionClass::Stable => 0,
            AttritionClass::AtRisk => 1,
        }
    }

    /// Human-readable label; the only place a label is derived from a class
    pub fn label(self) -> &'static str {
        match self {
            AttritionClass::Stable => LABEL_STABLE,
            AttritionClass::AtRisk => LABEL_AT_RISK,
        }
    }
}

impl TryFrom<u8> for AttritionClass {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AttritionClass::Stable),
            1 => Ok(AttritionClass::AtRisk),
            other => Err(format!("undefined attrition class: {}", other)),
        }
    }
}

/// Result of a single prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    pub class: AttritionClass,
    /// Probability of class 1, in [0, 1], rounded to 4 decimals
    pub probability: f64,
}

impl PredictionResult {
    pub fn label(&self) -> &'static str {
        self.class.label()
    }
}

/// JSON body returned by `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PredictionOutput {
    /// 1 if the employee is at risk of leaving, 0 otherwise
    #[schema(example = 0)]
    pub prediction: u8,
    #[schema(example = "Employé stable")]
    pub label: String,
    /// Probability of leaving, rounded to 4 decimals
    #[schema(example = 0.2315)]
    pub probabilite_depart: f64,
}

impl From<PredictionResult> for PredictionOutput {
    fn from(result: PredictionResult) -> Self {
        Self {
            prediction: result.class.as_u8(),
            label: result.label().to_string(),
            probabilite_depart: result.probability,
        }
    }
}

/// Audit record appended to the prediction log
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionLogEntry {
    pub age: i64,
    pub revenu_mensuel: f64,
    pub departement: String,
    pub poste: String,
    pub heure_supplementaires: String,
    pub frequence_deplacement: String,
    pub prediction: u8,
    pub label: String,
    pub probabilite_depart: f64,
    pub logged_at: DateTime<Utc>,
}

impl PredictionLogEntry {
    pub fn new(record: &EmployeeRecord, result: &PredictionResult) -> Self {
        Self {
            age: record.age,
            revenu_mensuel: record.revenu_mensuel,
            departement: record.departement.to_string(),
            poste: record.poste.to_string(),
            heure_supplementaires: record.heure_supplementaires.to_string(),
            frequence_deplacement: record.frequence_deplacement.to_string(),
            prediction: result.class.as_u8(),
            label: result.label().to_string(),
            probabilite_depart: result.probability,
            logged_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_follows_class() {
        assert_eq!(AttritionClass::AtRisk.label(), "Risque de départ");
        assert_eq!(AttritionClass::Stable.label(), "Employé stable");
    }

    #[test]
    fn test_class_rejects_undefined_values() {
        assert_eq!(AttritionClass::try_from(1u8).unwrap(), AttritionClass::AtRisk);
        assert!(AttritionClass::try_from(2u8).is_err());
    }

    #[test]
    fn test_output_from_result() {
        let output = PredictionOutput::from(PredictionResult {
            class: AttritionClass::AtRisk,
            probability: 0.8123,
        });

        assert_eq!(output.prediction, 1);
        assert_eq!(output.label, LABEL_AT_RISK);
        assert_eq!(output.probabilite_depart, 0.8123);
    }
}

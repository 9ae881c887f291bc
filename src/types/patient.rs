//! Typed patient record for the heart disease feature set

use crate::types::record::FeatureRecord;
use serde::{Deserialize, Serialize};

/// Wire names of the heart disease features, in training order
pub const FEATURE_NAMES: [&str; 9] = [
    "Age",
    "Sex",
    "ChestPainType",
    "Cholesterol",
    "FastingBS",
    "MaxHR",
    "ExerciseAngina",
    "Oldpeak",
    "ST_Slope",
];

/// One patient's inputs as the gateway and tooling produce them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientFeatures {
    /// Age in years
    #[serde(rename = "Age")]
    pub age: i64,

    /// Sex (0 = female, 1 = male)
    #[serde(rename = "Sex")]
    pub sex: i64,

    /// Chest pain type, encoded as a category index
    #[serde(rename = "ChestPainType")]
    pub chest_pain_type: i64,

    /// Serum cholesterol (mg/dl)
    #[serde(rename = "Cholesterol")]
    pub cholesterol: i64,

    /// Fasting blood sugar > 120 mg/dl (1 = true, 0 = false)
    #[serde(rename = "FastingBS")]
    pub fasting_bs: i64,

    /// Maximum heart rate achieved
    #[serde(rename = "MaxHR")]
    pub max_hr: i64,

    /// Exercise-induced angina (1 = yes, 0 = no)
    #[serde(rename = "ExerciseAngina")]
    pub exercise_angina: i64,

    /// ST depression induced by exercise relative to rest
    #[serde(rename = "Oldpeak")]
    pub oldpeak: f64,

    /// Slope of the peak exercise ST segment, encoded as a category index
    #[serde(rename = "ST_Slope")]
    pub st_slope: i64,
}

impl PatientFeatures {
    /// Convert into the untyped record the prediction service consumes
    pub fn to_record(&self) -> FeatureRecord {
        FeatureRecord::new()
            .with("Age", self.age)
            .with("Sex", self.sex)
            .with("ChestPainType", self.chest_pain_type)
            .with("Cholesterol", self.cholesterol)
            .with("FastingBS", self.fasting_bs)
            .with("MaxHR", self.max_hr)
            .with("ExerciseAngina", self.exercise_angina)
            .with("Oldpeak", self.oldpeak)
            .with("ST_Slope", self.st_slope)
    }
}

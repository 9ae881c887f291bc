//! Form field parsing for the intake gateway

use crate::gateway::GatewayError;
use crate::types::patient::PatientFeatures;
use std::collections::HashMap;
use tracing::debug;

/// Form field names, in the order the input page shows them
pub const FORM_FIELDS: [&str; 9] = [
    "age",
    "sex",
    "chestpain",
    "cholesterol",
    "fastingbs",
    "maxhr",
    "exerciseangina",
    "oldpeak",
    "stslope",
];

/// Parse submitted form fields into typed patient features.
///
/// Every field is an integer except `oldpeak`, which is a float.
pub fn parse_form(fields: &HashMap<String, String>) -> Result<PatientFeatures, GatewayError> {
    Ok(PatientFeatures {
        age: int_field(fields, "age")?,
        sex: int_field(fields, "sex")?,
        chest_pain_type: int_field(fields, "chestpain")?,
        cholesterol: int_field(fields, "cholesterol")?,
        fasting_bs: int_field(fields, "fastingbs")?,
        max_hr: int_field(fields, "maxhr")?,
        exercise_angina: int_field(fields, "exerciseangina")?,
        oldpeak: float_field(fields, "oldpeak")?,
        st_slope: int_field(fields, "stslope")?,
    })
}

fn raw_field<'a>(fields: &'a HashMap<String, String>, name: &str) -> Result<&'a str, GatewayError> {
    match fields.get(name).map(|v| v.trim()) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(GatewayError::InvalidField {
            field: name.to_string(),
            reason: "field is required".to_string(),
        }),
    }
}

fn int_field(fields: &HashMap<String, String>, name: &str) -> Result<i64, GatewayError> {
    let raw = raw_field(fields, name)?;
    raw.parse().map_err(|_| {
        debug!(field = name, value = raw, "Unparsable integer field");
        GatewayError::InvalidField {
            field: name.to_string(),
            reason: "expected an integer".to_string(),
        }
    })
}

fn float_field(fields: &HashMap<String, String>, name: &str) -> Result<f64, GatewayError> {
    let raw = raw_field(fields, name)?;
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => {
            debug!(field = name, value = raw, "Unparsable number field");
            Err(GatewayError::InvalidField {
                field: name.to_string(),
                reason: "expected a number".to_string(),
            })
        }
    }
}

//! Load-medication form
//!
//! The operator types a name, a weight and a code; the fleet service creates
//! the medication when it is loaded onto a drone.

use serde::Deserialize;
use thiserror::Error;

use crate::fleet::Medication;

/// Image reference sent when the form leaves it blank
pub const DEFAULT_IMG_URL: &str = "rpc://121.002.000.broad.img";

/// Rejected form input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("medication name may only contain letters, digits, '-' and '_': {0:?}")]
    InvalidName(String),

    #[error("medication code may only contain letters, digits and '_': {0:?}")]
    InvalidCode(String),

    #[error("medication weight must be a positive number of grams: {0}")]
    InvalidWeight(f64),
}

/// Fields of the load-medication form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MedicationForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub img_url: Option<String>,
}

impl MedicationForm {
    pub fn new(name: impl Into<String>, weight: f64, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight,
            code: code.into(),
            img_url: None,
        }
    }

    /// Check the fields and build the record sent to the fleet service
    ///
    /// Codes are uppercased before checking.
    pub fn into_medication(self) -> Result<Medication, FormError> {
        let name_ok = !self.name.is_empty()
            && self
                .name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !name_ok {
            return Err(FormError::InvalidName(self.name));
        }

        let code = self.code.to_ascii_uppercase();
        let code_ok = !code.is_empty()
            && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !code_ok {
            return Err(FormError::InvalidCode(self.code));
        }

        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(FormError::InvalidWeight(self.weight));
        }

        let img_url = self
            .img_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_IMG_URL.to_string());

        Ok(Medication {
            id: None,
            name: self.name,
            weight: self.weight,
            code,
            img_url: Some(img_url),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_form() {
        let med = MedicationForm::new("Para-cetamol_500", 120.0, "pcm_500")
            .into_medication()
            .unwrap();

        assert_eq!(med.id, None);
        assert_eq!(med.name, "Para-cetamol_500");
        assert_eq!(med.code, "PCM_500");
        assert_eq!(med.img_url.as_deref(), Some(DEFAULT_IMG_URL));
    }

    #[test]
    fn test_rejected_names() {
        for name in ["", "Aspirin 100", "Ibuprofen!", "Café"] {
            assert!(
                matches!(
                    MedicationForm::new(name, 10.0, "ASP").into_medication(),
                    Err(FormError::InvalidName(_))
                ),
                "{:?}",
                name
            );
        }
    }

    #[test]
    fn test_rejected_codes() {
        for code in ["", "ASP-01", "ASP 01", "ÄSP"] {
            assert!(
                matches!(
                    MedicationForm::new("Aspirin", 10.0, code).into_medication(),
                    Err(FormError::InvalidCode(_))
                ),
                "{:?}",
                code
            );
        }
    }

    #[test]
    fn test_rejected_weights() {
        for weight in [0.0, -5.0, f64::NAN] {
            assert!(matches!(
                MedicationForm::new("Aspirin", weight, "ASP").into_medication(),
                Err(FormError::InvalidWeight(_))
            ));
        }
    }

    #[test]
    fn test_explicit_img_url_kept() {
        let form = MedicationForm {
            img_url: Some("rpc://cdn/aspirin.png".to_string()),
            ..MedicationForm::new("Aspirin", 10.0, "ASP")
        };
        assert_eq!(
            form.into_medication().unwrap().img_url.as_deref(),
            Some("rpc://cdn/aspirin.png")
        );
    }
}

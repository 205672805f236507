use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Hotel-wide booking rules. Stored as a single row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub min_booking_length: i64,
    pub max_booking_length: i64,
    pub max_guests_per_booking: i64,
    pub breakfast_price: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_booking_length: 1,
            max_booking_length: 30,
            max_guests_per_booking: 8,
            breakfast_price: 15.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsPatch {
    pub min_booking_length: Option<i64>,
    pub max_booking_length: Option<i64>,
    pub max_guests_per_booking: Option<i64>,
    pub breakfast_price: Option<f64>,
}

impl Settings {
    /// Applies the patch and validates the merged result.
    pub fn merged(&self, patch: &SettingsPatch) -> Result<Settings, AppError> {
        let merged = Settings {
            min_booking_length: patch.min_booking_length.unwrap_or(self.min_booking_length),
            max_booking_length: patch.max_booking_length.unwrap_or(self.max_booking_length),
            max_guests_per_booking: patch
                .max_guests_per_booking
                .unwrap_or(self.max_guests_per_booking),
            breakfast_price: patch.breakfast_price.unwrap_or(self.breakfast_price),
        };
        merged.validate()?;
        Ok(merged)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.min_booking_length < 1 {
            return Err(AppError::Validation(
                "minimum nights must be at least 1".into(),
            ));
        }
        if self.max_booking_length < self.min_booking_length {
            return Err(AppError::Validation(
                "maximum nights cannot be below the minimum".into(),
            ));
        }
        if self.max_guests_per_booking < 1 {
            return Err(AppError::Validation(
                "maximum guests must be at least 1".into(),
            ));
        }
        if self.breakfast_price < 0.0 {
            return Err(AppError::Validation(
                "breakfast price cannot be negative".into(),
            ));
        }
        Ok(())
    }
}

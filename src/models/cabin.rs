use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cabin {
    pub id: i64,
    pub name: String,
    pub max_capacity: i64,
    pub regular_price: f64,
    pub discount: f64,
    pub description: String,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Writable cabin fields, used for both create and full update.
#[derive(Debug, Clone, Deserialize)]
pub struct CabinInput {
    pub name: String,
    pub max_capacity: i64,
    pub regular_price: f64,
    /// Percentage off `regular_price`, 0 to 100.
    #[serde(default)]
    pub discount: f64,
    pub description: String,
    pub image: Option<String>,
}

impl CabinInput {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("cabin name is required".into()));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::Validation("description is required".into()));
        }
        if self.max_capacity < 1 {
            return Err(AppError::Validation("capacity must be at least 1".into()));
        }
        if self.regular_price < 1.0 {
            return Err(AppError::Validation("price must be greater than 0".into()));
        }
        if self.discount < 0.0 {
            return Err(AppError::Validation("discount cannot be negative".into()));
        }
        if self.discount > 100.0 {
            return Err(AppError::Validation(
                "discount is a percentage and cannot exceed 100".into(),
            ));
        }
        Ok(())
    }
}

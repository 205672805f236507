use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Guest {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub national_id: Option<String>,
    pub nationality: Option<String>,
    pub country_flag: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuestInput {
    pub full_name: String,
    pub email: String,
    pub national_id: Option<String>,
    pub nationality: Option<String>,
    pub country_flag: Option<String>,
}

impl GuestInput {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.full_name.trim().is_empty() {
            return Err(AppError::Validation("full name is required".into()));
        }
        if !looks_like_email(self.email.trim()) {
            return Err(AppError::Validation(format!(
                "invalid email address: {}",
                self.email
            )));
        }
        Ok(())
    }
}

fn looks_like_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !s.contains(char::is_whitespace)
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

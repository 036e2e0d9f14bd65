//! Leads captured by the brand website's sign-up form.
//!
//! Nothing lists these rows, so creating one touches no cache namespace.

use std::sync::Arc;

use time::Date;

use crate::application::error::ServiceError;
use crate::application::repos::{CreateUserDetailsParams, UserDetailsWriteRepo};
use crate::domain::entities::UserDetailsRecord;
use crate::domain::error::{DomainError, ensure_present};
use crate::domain::types::Gender;

#[derive(Debug, Clone, Default)]
pub struct CreateUserDetailsCommand {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub dob: Option<Date>,
    pub gender: Option<String>,
    pub cms_user_id: Option<i64>,
    pub source: Option<String>,
    pub otp_verified: bool,
}

#[derive(Clone)]
pub struct UserDetailsService {
    writer: Arc<dyn UserDetailsWriteRepo>,
}

impl UserDetailsService {
    pub fn new(writer: Arc<dyn UserDetailsWriteRepo>) -> Self {
        Self { writer }
    }

    pub async fn create(
        &self,
        command: CreateUserDetailsCommand,
    ) -> Result<UserDetailsRecord, ServiceError> {
        let params = validate_create(command)?;
        self.writer
            .create_user_details(params)
            .await
            .map_err(|err| ServiceError::persistence("create", "user details", err))
    }
}

fn validate_create(
    command: CreateUserDetailsCommand,
) -> Result<CreateUserDetailsParams, DomainError> {
    ensure_present(&command.name, "name")?;
    ensure_present(&command.phone, "phone")?;
    ensure_present(&command.email, "email")?;
    let gender = command
        .gender
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(Gender::parse)
        .transpose()?;

    Ok(CreateUserDetailsParams {
        name: command.name.trim().to_string(),
        phone: command.phone.trim().to_string(),
        email: command.email.trim().to_string(),
        dob: command.dob,
        gender: gender.map(|gender| gender.as_str().to_string()),
        cms_user_id: command.cms_user_id,
        source: command.source.filter(|source| !source.trim().is_empty()),
        otp_verified: command.otp_verified,
    })
}

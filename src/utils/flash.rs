//! Flashed session data.
//!
//! Form handlers redirect after a POST. Anything the next page needs to
//! render (validation errors, the submitted input, a success banner) is
//! stored in the session and removed the first time it is read.

use serde_json::{Map, Value};
use storehub_core::AppError;
use tower_sessions::Session;

use crate::validator::FieldErrors;

const ERRORS_KEY: &str = "flash.errors";
const OLD_INPUT_KEY: &str = "flash.old";
const SUCCESS_KEY: &str = "flash.success";

/// Everything flashed by the previous request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flashed {
    pub errors: FieldErrors,
    pub old: Map<String, Value>,
    pub success: Option<String>,
}

pub async fn flash_errors(session: &Session, errors: &FieldErrors) -> Result<(), AppError> {
    session.insert(ERRORS_KEY, errors).await?;
    Ok(())
}

/// Flashes a single error on one field.
pub async fn flash_error(session: &Session, field: &str, message: &str) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), vec![message.to_string()]);
    flash_errors(session, &errors).await
}

pub async fn flash_old_input(session: &Session, old: Map<String, Value>) -> Result<(), AppError> {
    session.insert(OLD_INPUT_KEY, old).await?;
    Ok(())
}

pub async fn flash_success(session: &Session, message: &str) -> Result<(), AppError> {
    session.insert(SUCCESS_KEY, message).await?;
    Ok(())
}

/// Reads and clears the flashed values.
pub async fn take(session: &Session) -> Result<Flashed, AppError> {
    Ok(Flashed {
        errors: session
            .remove::<FieldErrors>(ERRORS_KEY)
            .await?
            .unwrap_or_default(),
        old: session
            .remove::<Map<String, Value>>(OLD_INPUT_KEY)
            .await?
            .unwrap_or_default(),
        success: session.remove::<String>(SUCCESS_KEY).await?,
    })
}

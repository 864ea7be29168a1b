use crate::constants::{
    MIN_PASSWORD_LEN, MSG_CREATE_MISSING_FIELDS, MSG_LOGIN_MISSING_FIELDS, MSG_PASSWORD_MISMATCH,
    MSG_PASSWORD_TOO_SHORT,
};
use crate::utils::SiteScanError;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Both login fields must be filled in
pub fn validate_login(username: &str, password: &str) -> Result<(), SiteScanError> {
    if is_blank(username) || password.is_empty() {
        return Err(SiteScanError::Validation(MSG_LOGIN_MISSING_FIELDS.to_string()));
    }
    Ok(())
}

/// Account form checks, stopping at the first failure:
/// all fields present, passwords equal, password long enough.
pub fn validate_new_account(
    username: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), SiteScanError> {
    if is_blank(username) || password.is_empty() || confirm_password.is_empty() {
        return Err(SiteScanError::Validation(MSG_CREATE_MISSING_FIELDS.to_string()));
    }
    if password != confirm_password {
        return Err(SiteScanError::Validation(MSG_PASSWORD_MISMATCH.to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SiteScanError::Validation(MSG_PASSWORD_TOO_SHORT.to_string()));
    }
    Ok(())
}

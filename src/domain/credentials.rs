// Console login check
use thiserror::Error;

const ACCEPTED_USERNAME: &str = "admin";
const ACCEPTED_PASSWORD: &str = "password";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Username should not contain numbers")]
    InvalidUsernameFormat,
    #[error("Invalid username or password")]
    InvalidCredentials,
}

/// Checks a login attempt against the single console account.
///
/// The username format is checked first, so a username with a digit is
/// rejected without comparing the password.
pub fn authenticate(username: &str, password: &str) -> Result<(), AuthError> {
    if username.chars().any(|c| c.is_ascii_digit()) {
        return Err(AuthError::InvalidUsernameFormat);
    }

    if username == ACCEPTED_USERNAME && password == ACCEPTED_PASSWORD {
        Ok(())
    } else {
        Err(AuthError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_fixed_account() {
        assert_eq!(authenticate("admin", "password"), Ok(()));
    }

    #[test]
    fn test_rejects_digit_in_username_before_comparing() {
        assert_eq!(
            authenticate("admin1", "password"),
            Err(AuthError::InvalidUsernameFormat)
        );
        assert_eq!(
            authenticate("4dmin", "wrong"),
            Err(AuthError::InvalidUsernameFormat)
        );
    }

    #[test]
    fn test_rejects_mismatch() {
        assert_eq!(
            authenticate("admin", "wrong"),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            authenticate("Admin", "password"),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(authenticate("", ""), Err(AuthError::InvalidCredentials));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AuthError::InvalidUsernameFormat.to_string(),
            "Username should not contain numbers"
        );
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid username or password"
        );
    }
}

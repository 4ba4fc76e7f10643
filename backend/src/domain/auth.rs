//! Authentication primitives: login credentials and registration requests.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use serde_json::json;
use zeroize::Zeroizing;

use super::{DisplayName, EmailAddress, Error, UserValidationError};

/// Domain error returned when login or registration values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// A registration field failed user validation.
    #[error(transparent)]
    User(#[from] UserValidationError),
}

impl CredentialsValidationError {
    /// Name of the form field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail => "email",
            Self::EmptyPassword => "password",
            Self::User(err) => match err {
                UserValidationError::EmptyName | UserValidationError::NameTooLong { .. } => "name",
                _ => "email",
            },
        }
    }

    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyEmail => "empty_email",
            Self::EmptyPassword => "empty_password",
            Self::User(err) => match err {
                UserValidationError::EmptyName => "empty_name",
                UserValidationError::NameTooLong { .. } => "name_too_long",
                UserValidationError::EmailTooLong { .. } => "email_too_long",
                UserValidationError::MalformedEmail => "malformed_email",
                UserValidationError::EmptyId | UserValidationError::InvalidId => "invalid_id",
                UserValidationError::EmptyEmail => "empty_email",
            },
        }
    }
}

impl From<CredentialsValidationError> for Error {
    fn from(err: CredentialsValidationError) -> Self {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": err.field(),
            "code": err.code(),
        }))
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is trimmed and must not be empty after trimming. It is not
///   shape-checked: a malformed address simply fails to authenticate.
/// - `password` must be non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use docvault::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("alice@x.com", "pw123").unwrap();
/// assert_eq!(creds.email(), "alice@x.com");
/// assert_eq!(creds.password(), "pw123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(CredentialsValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email string used for the account lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: DisplayName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw registration form values.
    ///
    /// # Examples
    /// ```
    /// use docvault::domain::Registration;
    ///
    /// let reg = Registration::try_from_parts("Alice", "alice@x.com", "pw123").unwrap();
    /// assert_eq!(reg.email().as_ref(), "alice@x.com");
    /// ```
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let name = DisplayName::new(name)?;
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            name,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Display name to store.
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Login email to store.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password to hash.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

//! Driving ports for the credential store use-cases.
//!
//! Inbound adapters call these to register and authenticate users without
//! knowing the backing infrastructure, so handler tests can swap in doubles.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, UserId};

/// Use-case port for authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    ///
    /// Unknown emails and wrong passwords both fail with
    /// [`crate::domain::ErrorCode::Unauthorized`] and the same message.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Use-case port for account creation.
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Create an account, failing with [`crate::domain::ErrorCode::Conflict`]
    /// when the email is already registered.
    async fn register(&self, registration: &Registration) -> Result<UserId, Error>;
}

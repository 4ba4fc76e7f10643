//! Credential store service.
//!
//! Implements the registration and login driving ports on top of a
//! [`UserRepository`] and a [`PasswordHasher`]. Unknown emails and wrong
//! passwords fail identically so callers cannot probe for accounts, and both
//! pay for one hash verification. Hashing runs on Tokio's blocking pool.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    LoginService, PasswordHashError, PasswordHasher, RegistrationService, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    EmailAddress, Error, LoginCredentials, PasswordHash, Registration, TraceId, User,
    UserAccount, UserId,
};

/// Message shared by every failed login.
const INVALID_CREDENTIALS: &str = "invalid credentials";
/// Message returned when an email is already registered.
pub const DUPLICATE_EMAIL: &str = "Email already exists!";
/// Hashed once and verified against when the email has no account.
const UNKNOWN_ACCOUNT_PASSWORD: &str = "docvault-unknown-account";

/// Account service implementing [`RegistrationService`] and [`LoginService`].
pub struct AccountService<R: ?Sized, H: ?Sized> {
    users: Arc<R>,
    hasher: Arc<H>,
    unknown_account_hash: Arc<OnceLock<PasswordHash>>,
}

impl<R: ?Sized, H: ?Sized> AccountService<R, H> {
    /// Create a service over the given repository and hasher.
    pub fn new(users: Arc<R>, hasher: Arc<H>) -> Self {
        Self {
            users,
            hasher,
            unknown_account_hash: Arc::new(OnceLock::new()),
        }
    }
}

impl<R, H> AccountService<R, H>
where
    R: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized + 'static,
{
    fn map_persistence_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::DuplicateEmail => Error::conflict(DUPLICATE_EMAIL),
        }
    }

    fn map_hash_error(error: PasswordHashError) -> Error {
        Error::internal(format!("password hashing failed: {error}"))
    }

    /// Run `job` against the hasher on the blocking pool.
    async fn with_hasher<T, F>(&self, job: F) -> Result<T, Error>
    where
        F: FnOnce(&H) -> Result<T, PasswordHashError> + Send + 'static,
        T: Send + 'static,
    {
        let hasher = Arc::clone(&self.hasher);
        let trace_id = TraceId::current();
        let joined =
            tokio::task::spawn_blocking(move || TraceId::sync_scope(trace_id, || job(&hasher)))
                .await
                .map_err(|err| {
                    Error::internal(format!("password hashing task did not complete: {err}"))
                })?;
        joined.map_err(Self::map_hash_error)
    }

    /// Burn one verification so a miss costs as much as a wrong password.
    async fn verify_unknown_account(&self, password: Zeroizing<String>) -> Result<(), Error> {
        let unknown_account_hash = Arc::clone(&self.unknown_account_hash);
        self.with_hasher(move |hasher| {
            let hash = match unknown_account_hash.get() {
                Some(hash) => hash.clone(),
                None => {
                    let hash = hasher.hash(UNKNOWN_ACCOUNT_PASSWORD)?;
                    unknown_account_hash.get_or_init(|| hash).clone()
                }
            };
            hasher.verify(&password, &hash).map(|_| ())
        })
        .await
    }
}

#[async_trait]
impl<R, H> RegistrationService for AccountService<R, H>
where
    R: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized + 'static,
{
    async fn register(&self, registration: &Registration) -> Result<UserId, Error> {
        let password = Zeroizing::new(registration.password().to_owned());
        let password_hash = self
            .with_hasher(move |hasher| hasher.hash(&password))
            .await?;
        let user = User::new(
            UserId::random(),
            registration.name().clone(),
            registration.email().clone(),
        );
        let account = UserAccount::new(user, password_hash);

        self.users
            .insert(&account)
            .await
            .map_err(Self::map_persistence_error)?;

        let id = account.user().id().clone();
        info!(user_id = %id, "registered user");
        Ok(id)
    }
}

#[async_trait]
impl<R, H> LoginService for AccountService<R, H>
where
    R: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized + 'static,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        // A malformed email cannot belong to any account.
        let Ok(email) = EmailAddress::new(credentials.email()) else {
            warn!("login rejected: malformed email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let password = Zeroizing::new(credentials.password().to_owned());
        let Some(account) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(Self::map_persistence_error)?
        else {
            self.verify_unknown_account(password).await?;
            warn!("login rejected: unknown account");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let stored = account.password_hash().clone();
        let verified = self
            .with_hasher(move |hasher| hasher.verify(&password, &stored))
            .await?;
        if !verified {
            warn!(user_id = %account.user().id(), "login rejected: wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        info!(user_id = %account.user().id(), "login succeeded");
        Ok(account.user().id().clone())
    }
}

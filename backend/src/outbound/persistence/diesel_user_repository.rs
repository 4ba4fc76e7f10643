//! PostgreSQL-backed `UserRepository` using Diesel.
//!
//! Email uniqueness is enforced by the `users_email_key` constraint; a
//! violation surfaces as [`UserPersistenceError::DuplicateEmail`] and leaves
//! the existing row untouched.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    DisplayName, EmailAddress, PasswordHash, User, UserAccount, UserId, UserValidationError,
};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.message())
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    match classify_diesel_error(&error) {
        DieselFailure::UniqueViolation => UserPersistenceError::duplicate_email(),
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::Query(message) => UserPersistenceError::query(message),
    }
}

fn row_to_account(row: UserRow) -> Result<UserAccount, UserPersistenceError> {
    let corrupt = |err: UserValidationError| {
        UserPersistenceError::query(format!("stored user {} is invalid: {err}", row.id))
    };
    let name = DisplayName::new(row.name.clone()).map_err(corrupt)?;
    let email = EmailAddress::new(row.email.clone()).map_err(corrupt)?;
    let user = User::new(UserId::from_uuid(row.id), name, email);
    Ok(UserAccount::new(user, PasswordHash::new(row.password_hash)))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user = account.user();
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            name: user.name().as_ref(),
            email: user.email().as_ref(),
            password_hash: account.password_hash().as_str(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_account).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(name: &str, email: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            email: email.to_owned(),
            password_hash: "$argon2id$stored".to_owned(),
        }
    }

    #[rstest]
    fn valid_rows_become_accounts() {
        let account = row_to_account(row("Alice", "alice@x.com")).expect("valid row");
        assert_eq!(account.user().email().as_ref(), "alice@x.com");
        assert_eq!(account.password_hash().as_str(), "$argon2id$stored");
    }

    #[rstest]
    #[case("", "alice@x.com")]
    #[case("Alice", "not-an-email")]
    fn corrupt_rows_are_query_errors(#[case] name: &str, #[case] email: &str) {
        let err = row_to_account(row(name, email)).expect_err("corrupt row");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    fn pool_errors_are_connection_errors() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, UserPersistenceError::connection("timed out"));
    }
}

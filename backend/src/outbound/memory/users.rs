use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, UserAccount};

/// Process-local [`UserRepository`] keyed by exact email.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    accounts: Mutex<HashMap<EmailAddress, UserAccount>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> UserPersistenceError {
    UserPersistenceError::connection("user store lock poisoned")
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut accounts = self.accounts.lock().map_err(|_| poisoned())?;
        let email = account.user().email().clone();
        if accounts.contains_key(&email) {
            return Err(UserPersistenceError::duplicate_email());
        }
        accounts.insert(email, account.clone());
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let accounts = self.accounts.lock().map_err(|_| poisoned())?;
        Ok(accounts.get(email).cloned())
    }
}

//! Builders wiring domain services onto the configured adapters.

use std::sync::Arc;

use tracing::warn;

use docvault::domain::ports::{DocumentRepository, UserRepository};
use docvault::domain::{AccountService, UploadService, UploadServicePorts};
use docvault::inbound::http::state::{HttpState, HttpStatePorts};
use docvault::inbound::http::views::Views;
use docvault::outbound::crypto::Argon2PasswordHasher;
use docvault::outbound::memory::{InMemoryDocumentRepository, InMemoryUserRepository};
use docvault::outbound::pdf::PdfTextExtractor;
use docvault::outbound::persistence::{DieselDocumentRepository, DieselUserRepository};

use super::ServerConfig;

/// Pick Diesel repositories when a pool is configured, in-memory otherwise.
fn build_repositories(
    config: &ServerConfig,
) -> (Arc<dyn UserRepository>, Arc<dyn DocumentRepository>) {
    match &config.db_pool {
        Some(pool) => (
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselDocumentRepository::new(pool.clone())),
        ),
        None => {
            warn!("no database configured; accounts and documents are kept in memory");
            (
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryDocumentRepository::new()),
            )
        }
    }
}

/// Build the shared HTTP state from the server configuration.
pub(super) fn build_http_state(config: &ServerConfig, views: Arc<Views>) -> HttpState {
    let (users, documents) = build_repositories(config);
    let accounts = Arc::new(AccountService::new(
        users,
        Arc::new(Argon2PasswordHasher::new()),
    ));
    let uploads = Arc::new(UploadService::new(
        config.upload_policy.clone(),
        UploadServicePorts {
            store: Arc::clone(&config.upload_store),
            extractor: Arc::new(PdfTextExtractor::new()),
            documents,
            clock: Arc::new(mockable::DefaultClock),
        },
    ));

    HttpState::new(
        HttpStatePorts {
            login: accounts.clone(),
            registration: accounts,
            uploads: uploads.clone(),
            documents: uploads,
        },
        views,
        config.max_upload_bytes,
    )
}

//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::Key;
use docvault::domain::UploadPolicy;
use docvault::domain::ports::UploadStore;
use docvault::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) upload_store: Arc<dyn UploadStore>,
    pub(crate) upload_policy: UploadPolicy,
    pub(crate) max_upload_bytes: usize,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration with the default upload policy and limit.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        bind_addr: SocketAddr,
        upload_store: Arc<dyn UploadStore>,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            bind_addr,
            upload_store,
            upload_policy: UploadPolicy::default(),
            max_upload_bytes: super::settings::DEFAULT_MAX_UPLOAD_BYTES,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without one, accounts and documents live in memory and vanish on
    /// restart.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override which files are accepted and how large they may be.
    #[must_use]
    pub fn with_upload_limits(mut self, policy: UploadPolicy, max_upload_bytes: usize) -> Self {
        self.upload_policy = policy;
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

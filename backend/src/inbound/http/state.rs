//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use super::views::Views;
use crate::domain::ports::{
    DocumentUploadCommand, DocumentsQuery, LoginService, RegistrationService,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub uploads: Arc<dyn DocumentUploadCommand>,
    pub documents: Arc<dyn DocumentsQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub uploads: Arc<dyn DocumentUploadCommand>,
    pub documents: Arc<dyn DocumentsQuery>,
    pub views: Arc<Views>,
    /// Largest accepted upload body, in bytes.
    pub max_upload_bytes: usize,
}

impl HttpState {
    /// Construct state from the port bundle, compiled views, and upload cap.
    pub fn new(ports: HttpStatePorts, views: Arc<Views>, max_upload_bytes: usize) -> Self {
        let HttpStatePorts {
            login,
            registration,
            uploads,
            documents,
        } = ports;
        Self {
            login,
            registration,
            uploads,
            documents,
            views,
            max_upload_bytes,
        }
    }
}

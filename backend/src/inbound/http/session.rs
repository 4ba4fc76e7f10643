//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! [`SessionContext`] wraps the Actix session cookie and exposes the two
//! things handlers store there: the authenticated user id and pending flash
//! notices.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const FLASHES_KEY: &str = "_flashes";

/// Severity of a flash notice; doubles as the CSS class in templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Danger,
    Info,
}

/// One-shot notice shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id, rotating the session key first.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop the identity and any pending notices.
    ///
    /// The cookie is rewritten rather than purged so a notice queued
    /// afterwards still reaches the client.
    pub fn clear(&self) {
        self.0.clear();
        self.0.renew();
    }

    /// Fetch the current user id, if present and well-formed.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match UserId::new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!("invalid user id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Queue a notice for the next rendered page.
    pub fn push_flash(&self, level: FlashLevel, message: impl Into<String>) -> Result<(), Error> {
        let mut flashes = self.pending_flashes();
        flashes.push(Flash::new(level, message));
        self.0
            .insert(FLASHES_KEY, flashes)
            .map_err(|error| Error::internal(format!("failed to queue notice: {error}")))
    }

    /// Drain queued notices.
    pub fn take_flashes(&self) -> Vec<Flash> {
        let flashes = self.pending_flashes();
        if !flashes.is_empty() {
            self.0.remove(FLASHES_KEY);
        }
        flashes
    }

    fn pending_flashes(&self) -> Vec<Flash> {
        match self.0.get::<Vec<Flash>>(FLASHES_KEY) {
            Ok(flashes) => flashes.unwrap_or_default(),
            Err(error) => {
                tracing::warn!("discarding unreadable flash notices: {error}");
                Vec::new()
            }
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

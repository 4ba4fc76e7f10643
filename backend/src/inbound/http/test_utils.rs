//! Test helpers for inbound HTTP components.

use std::sync::{Arc, Mutex};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, http::header, test, web};

use super::session::SessionContext;
use super::state::{HttpState, HttpStatePorts};
use super::views::Views;
use crate::domain::ports::{TextExtractor, UploadStore, UploadStoreError};
use crate::domain::{
    AccountService, Error, ExtractionOutcome, StoredFilename, UploadPolicy, UploadService,
    UploadServicePorts, UserId,
};
use crate::outbound::crypto::Argon2PasswordHasher;
use crate::outbound::memory::{InMemoryDocumentRepository, InMemoryUserRepository};

/// Route mounted by [`test_app`] that signs in a fresh random user.
pub const SIGN_IN_PATH: &str = "/test/sign-in";
const MULTIPART_BOUNDARY: &str = "docvault-test-boundary";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by a response.
///
/// # Panics
///
/// Panics when the response did not set the cookie.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

pub fn location<B>(response: &ServiceResponse<B>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

pub async fn body_text<B: MessageBody>(response: ServiceResponse<B>) -> String {
    let body = test::read_body(response).await;
    String::from_utf8_lossy(&body).into_owned()
}

/// `multipart/form-data` POST carrying a single file field.
pub fn multipart_request(
    uri: &str,
    field: &str,
    filename: &str,
    bytes: &[u8],
) -> test::TestRequest {
    let mut body = format!(
        "--{MULTIPART_BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: application/pdf\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    test::TestRequest::post()
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        ))
        .set_payload(body)
}

/// Extractor returning a fixed outcome regardless of input.
pub struct StubExtractor(pub ExtractionOutcome);

impl TextExtractor for StubExtractor {
    fn extract(&self, _bytes: &[u8]) -> ExtractionOutcome {
        self.0.clone()
    }
}

/// Upload store that remembers the names it was asked to write.
#[derive(Default)]
pub struct RecordingUploadStore {
    names: Mutex<Vec<String>>,
}

impl RecordingUploadStore {
    pub fn stored(&self) -> Vec<String> {
        self.names.lock().expect("store mutex").clone()
    }
}

impl UploadStore for RecordingUploadStore {
    fn store(&self, filename: &StoredFilename, _bytes: &[u8]) -> Result<(), UploadStoreError> {
        self.names
            .lock()
            .expect("store mutex")
            .push(filename.to_string());
        Ok(())
    }
}

/// Real services over in-memory adapters.
pub struct TestHarness {
    pub state: HttpState,
    pub uploads: Arc<RecordingUploadStore>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_outcome(ExtractionOutcome::Extracted("Hello".into()))
    }

    pub fn with_outcome(outcome: ExtractionOutcome) -> Self {
        let accounts = Arc::new(AccountService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(Argon2PasswordHasher::new()),
        ));
        let uploads = Arc::new(RecordingUploadStore::default());
        let upload_service = Arc::new(UploadService::new(
            UploadPolicy::default(),
            UploadServicePorts {
                store: uploads.clone(),
                extractor: Arc::new(StubExtractor(outcome)),
                documents: Arc::new(InMemoryDocumentRepository::new()),
                clock: Arc::new(mockable::DefaultClock),
            },
        ));
        let views = Arc::new(Views::new().expect("templates compile"));
        let state = HttpState::new(
            HttpStatePorts {
                login: accounts.clone(),
                registration: accounts,
                uploads: upload_service.clone(),
                documents: upload_service,
            },
            views,
            50 * 1024 * 1024,
        );
        Self { state, uploads }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.state.max_upload_bytes = max_upload_bytes;
        self
    }
}

/// Application with every page, a test session, and [`SIGN_IN_PATH`].
pub fn test_app(
    state: &HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(web::Data::new(state.clone()))
        .wrap(test_session_middleware())
        .configure(super::configure)
        .route(
            SIGN_IN_PATH,
            web::get().to(|session: SessionContext| async move {
                session.persist_user(&UserId::random())?;
                Ok::<_, Error>(HttpResponse::Ok())
            }),
        )
}

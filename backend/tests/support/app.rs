//! In-process application wired with real adapters over temporary storage.

use std::path::Path;
use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, http::header, test, web};
use docvault::Trace;
use docvault::domain::{AccountService, UploadPolicy, UploadService, UploadServicePorts};
use docvault::inbound::http::configure;
use docvault::inbound::http::state::{HttpState, HttpStatePorts};
use docvault::inbound::http::views::Views;
use docvault::outbound::crypto::Argon2PasswordHasher;
use docvault::outbound::memory::{InMemoryDocumentRepository, InMemoryUserRepository};
use docvault::outbound::pdf::PdfTextExtractor;
use docvault::outbound::storage::CapStdUploadStore;

const BOUNDARY: &str = "docvault-e2e-boundary";

/// State backed by in-memory repositories, the real PDF extractor, and a
/// cap-std store rooted at `upload_dir`.
pub fn http_state(upload_dir: &Path) -> HttpState {
    let accounts = Arc::new(AccountService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(Argon2PasswordHasher::new()),
    ));
    let store = CapStdUploadStore::open(upload_dir).expect("open upload dir");
    let uploads = Arc::new(UploadService::new(
        UploadPolicy::default(),
        UploadServicePorts {
            store: Arc::new(store),
            extractor: Arc::new(PdfTextExtractor::new()),
            documents: Arc::new(InMemoryDocumentRepository::new()),
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
        Arc::new(Views::new().expect("templates compile")),
        50 * 1024 * 1024,
    )
}

pub fn app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .wrap(
            SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                .cookie_name("session".to_owned())
                .cookie_secure(false)
                .build(),
        )
        .configure(configure)
}

pub fn form_post(uri: &str, body: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(body.to_owned())
}

pub fn file_upload(filename: &str, bytes: &[u8]) -> test::TestRequest {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: application/pdf\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    test::TestRequest::post()
        .uri("/upload")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}

pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

pub fn location<B>(response: &ServiceResponse<B>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

pub async fn body_text<B: MessageBody>(response: ServiceResponse<B>) -> String {
    String::from_utf8_lossy(&test::read_body(response).await).into_owned()
}

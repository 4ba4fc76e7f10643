//! Route guard for pages that need a signed-in user.
//!
//! Anonymous requests are redirected to the login page with a notice, the
//! way a browser-facing app expects, instead of receiving a bare 401.

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, http::StatusCode,
    http::header,
};
use futures_util::future::LocalBoxFuture;

use super::session::{FlashLevel, SessionContext};
use crate::domain::{Error, UserId};

/// Notice queued when an anonymous visitor hits a protected page.
pub const LOGIN_REQUIRED_NOTICE: &str = "Please log in to access this page.";
pub(crate) const LOGIN_PATH: &str = "/login";

/// Identity of the signed-in user making the request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserId);

/// Rejection produced by [`AuthenticatedUser`].
#[derive(Debug, thiserror::Error)]
pub enum GateRejection {
    #[error("login required")]
    LoginRequired,
    #[error(transparent)]
    Failed(#[from] Error),
}

impl ResponseError for GateRejection {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::LoginRequired => StatusCode::SEE_OTHER,
            Self::Failed(err) => err.status_code(),
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::LoginRequired => HttpResponse::SeeOther()
                .insert_header((header::LOCATION, LOGIN_PATH))
                .finish(),
            Self::Failed(err) => err.error_response(),
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = GateRejection;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = SessionContext::from_request(req, payload);
        let path = req.path().to_owned();
        Box::pin(async move {
            let session = session.await.map_err(Error::from)?;
            if let Some(user_id) = session.user_id()? {
                return Ok(Self(user_id));
            }
            tracing::info!(path = %path, "anonymous request redirected to login");
            session.push_flash(FlashLevel::Info, LOGIN_REQUIRED_NOTICE)?;
            Err(GateRejection::LoginRequired)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use actix_web::{App, test, web};

    #[actix_web::test]
    async fn anonymous_request_redirects_with_notice() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/protected",
                    web::get().to(|_user: AuthenticatedUser| async { HttpResponse::Ok() }),
                )
                .route(
                    "/notices",
                    web::get().to(|session: SessionContext| async move {
                        let messages: Vec<String> =
                            session.take_flashes().into_iter().map(|f| f.message).collect();
                        HttpResponse::Ok().body(messages.join(","))
                    }),
                ),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/protected").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok()),
            Some(LOGIN_PATH)
        );

        let notices = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/notices")
                .cookie(session_cookie(&res))
                .to_request(),
        )
        .await;
        assert_eq!(test::read_body(notices).await, LOGIN_REQUIRED_NOTICE);
    }

    #[actix_web::test]
    async fn signed_in_request_passes_identity() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/login",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_user(&UserId::random())?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/protected",
                    web::get().to(|user: AuthenticatedUser| async move {
                        HttpResponse::Ok().body(user.0.to_string())
                    }),
                ),
        )
        .await;

        let login =
            test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/protected")
                .cookie(session_cookie(&login))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}

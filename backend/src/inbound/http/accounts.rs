//! Registration, login, and logout pages.
//!
//! ```text
//! GET  /register   form
//! POST /register   name=..&email=..&password=..
//! GET  /login      form
//! POST /login      email=..&password=..
//! GET  /logout
//! ```

use actix_web::{HttpResponse, get, http::StatusCode, post, web};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::gate::AuthenticatedUser;
use super::see_other;
use super::session::{FlashLevel, SessionContext};
use super::state::HttpState;
use super::views::{NoContext, Page};
use crate::domain::{Error, ErrorCode, LoginCredentials, Registration};
use crate::inbound::http::ApiResult;

pub const ACCOUNT_CREATED: &str = "Account created! You can now log in.";
pub const LOGIN_SUCCEEDED: &str = "Login successful!";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials!";
pub const LOGGED_OUT: &str = "Logged out successfully!";

/// Form body for `POST /register`.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Form body for `POST /login`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Values echoed back into a re-rendered form. Never carries the password.
#[derive(Debug, Default, Serialize)]
struct FormEcho<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    email: &'a str,
}

#[get("/register")]
pub async fn register_form(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    state
        .views
        .respond(StatusCode::OK, Page::Register, &session, &NoContext::default())
}

/// Create an account and send the visitor to the login page.
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<RegisterForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    let registration =
        match Registration::try_from_parts(&form.name, &form.email, &form.password) {
            Ok(registration) => registration,
            Err(err) => {
                let error = Error::from(err);
                warn!(details = ?error.details(), "registration rejected: invalid form");
                session.push_flash(FlashLevel::Danger, error.message())?;
                let echo = FormEcho {
                    name: Some(&form.name),
                    email: &form.email,
                };
                return state
                    .views
                    .respond(StatusCode::BAD_REQUEST, Page::Register, &session, &echo);
            }
        };

    match state.registration.register(&registration).await {
        Ok(_) => {
            session.push_flash(FlashLevel::Success, ACCOUNT_CREATED)?;
            Ok(see_other("/login"))
        }
        Err(err) if err.code() == ErrorCode::Conflict => {
            session.push_flash(FlashLevel::Danger, err.message())?;
            Ok(see_other("/register"))
        }
        Err(err) => Err(err),
    }
}

#[get("/login")]
pub async fn login_form(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    state
        .views
        .respond(StatusCode::OK, Page::Login, &session, &NoContext::default())
}

/// Authenticate and establish a session.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    let echo = FormEcho {
        name: None,
        email: &form.email,
    };
    let credentials = match LoginCredentials::try_from_parts(&form.email, &form.password) {
        Ok(credentials) => credentials,
        Err(err) => {
            let error = Error::from(err);
            warn!(details = ?error.details(), "login rejected: invalid form");
            session.push_flash(FlashLevel::Danger, error.message())?;
            return state
                .views
                .respond(StatusCode::BAD_REQUEST, Page::Login, &session, &echo);
        }
    };

    match state.login.authenticate(&credentials).await {
        Ok(user_id) => {
            session.persist_user(&user_id)?;
            session.push_flash(FlashLevel::Success, LOGIN_SUCCEEDED)?;
            Ok(see_other("/upload"))
        }
        Err(err) if err.code() == ErrorCode::Unauthorized => {
            session.push_flash(FlashLevel::Danger, INVALID_CREDENTIALS)?;
            state
                .views
                .respond(StatusCode::UNAUTHORIZED, Page::Login, &session, &echo)
        }
        Err(err) => Err(err),
    }
}

/// End the session and return to the landing page.
#[get("/logout")]
pub async fn logout(user: AuthenticatedUser, session: SessionContext) -> ApiResult<HttpResponse> {
    session.clear();
    session.push_flash(FlashLevel::Success, LOGGED_OUT)?;
    tracing::info!(user_id = %user.0, "user logged out");
    Ok(see_other("/"))
}

//! HTTP inbound adapter serving the browser-facing pages.

pub mod accounts;
pub mod documents;
pub mod error;
pub mod gate;
pub mod health;
pub mod home;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod views;

use actix_web::{HttpResponse, http::header, web};

pub use error::ApiResult;

/// Register every page handler on `cfg`.
///
/// Health probes are registered separately because they carry their own
/// state and must not depend on the session middleware.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(home::index)
        .service(accounts::register_form)
        .service(accounts::register)
        .service(accounts::login_form)
        .service(accounts::login)
        .service(accounts::logout)
        .service(documents::upload_form)
        .service(documents::upload)
        .service(documents::extracted_data);
}

/// `303 See Other` to `location`, the redirect browsers follow with a GET.
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

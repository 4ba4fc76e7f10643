//! `/health/ready` and `/health/live` for container orchestration.
//!
//! Readiness stays at 503 until the listener is bound. Liveness answers 200
//! whenever a worker is able to respond at all.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, HttpResponseBuilder, get, http::header, web};

/// Set once the server accepts connections.
#[derive(Debug, Default)]
pub struct HealthState {
    ready: AtomicBool,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

fn uncached(mut builder: HttpResponseBuilder) -> HttpResponse {
    builder
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    if state.is_ready() {
        uncached(HttpResponse::Ok())
    } else {
        uncached(HttpResponse::ServiceUnavailable())
    }
}

#[get("/health/live")]
pub async fn live() -> HttpResponse {
    uncached(HttpResponse::Ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};
    use rstest::rstest;

    #[rstest]
    #[case(false, "/health/ready", StatusCode::SERVICE_UNAVAILABLE)]
    #[case(true, "/health/ready", StatusCode::OK)]
    #[case(false, "/health/live", StatusCode::OK)]
    #[actix_web::test]
    async fn readiness_waits_for_bind(
        #[case] bound: bool,
        #[case] path: &str,
        #[case] expected: StatusCode,
    ) {
        let state = web::Data::new(HealthState::new());
        if bound {
            state.mark_ready();
        }
        let app = test::init_service(
            App::new()
                .app_data(state)
                .service(ready)
                .service(live),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
        assert_eq!(res.status(), expected);
        assert_eq!(
            res.headers()
                .get(header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
            Some("no-store")
        );
    }
}

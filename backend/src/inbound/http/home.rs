//! Landing page.

use actix_web::{HttpResponse, get, http::StatusCode, web};

use super::session::SessionContext;
use super::state::HttpState;
use super::views::{NoContext, Page};
use crate::inbound::http::ApiResult;

/// `GET /`: public landing page.
#[get("/")]
pub async fn index(state: web::Data<HttpState>, session: SessionContext) -> ApiResult<HttpResponse> {
    state
        .views
        .respond(StatusCode::OK, Page::Index, &session, &NoContext::default())
}

#[cfg(test)]
mod tests {
    use crate::inbound::http::test_utils::{TestHarness, test_app};
    use actix_web::{http::StatusCode, test};

    #[actix_web::test]
    async fn landing_page_is_public() {
        let harness = TestHarness::new();
        let app = test::init_service(test_app(&harness.state)).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert!(String::from_utf8_lossy(&body).contains("DocVault"));
    }
}

//! Server-rendered pages.
//!
//! Templates are compiled into the binary and registered once at startup.
//! Every page receives the pending flash notices and a `logged_in` flag so
//! the shared layout can render navigation.

use actix_web::{HttpResponse, http::StatusCode, http::header::ContentType};
use serde::Serialize;
use tera::{Context, Tera};
use tracing::error;

use super::session::SessionContext;
use crate::domain::Error;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../../templates/base.html")),
    ("index.html", include_str!("../../../templates/index.html")),
    ("register.html", include_str!("../../../templates/register.html")),
    ("login.html", include_str!("../../../templates/login.html")),
    ("upload.html", include_str!("../../../templates/upload.html")),
    (
        "extracted_text.html",
        include_str!("../../../templates/extracted_text.html"),
    ),
    (
        "extracted_data.html",
        include_str!("../../../templates/extracted_data.html"),
    ),
];

/// Pages the application can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Index,
    Register,
    Login,
    Upload,
    ExtractedText,
    ExtractedData,
}

impl Page {
    fn template(self) -> &'static str {
        match self {
            Self::Index => "index.html",
            Self::Register => "register.html",
            Self::Login => "login.html",
            Self::Upload => "upload.html",
            Self::ExtractedText => "extracted_text.html",
            Self::ExtractedData => "extracted_data.html",
        }
    }
}

/// Raised when the embedded templates fail to compile.
#[derive(Debug, thiserror::Error)]
#[error("failed to load page templates: {0}")]
pub struct ViewError(#[from] tera::Error);

/// Compiled template set.
pub struct Views {
    tera: Tera,
}

impl Views {
    /// Compile the embedded templates.
    pub fn new() -> Result<Self, ViewError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        Ok(Self { tera })
    }

    /// Render `page` with `context` to an HTML string.
    pub fn render(&self, page: Page, context: &Context) -> Result<String, Error> {
        self.tera.render(page.template(), context).map_err(|err| {
            error!(template = page.template(), error = ?err, "page render failed");
            Error::internal(format!("failed to render {}", page.template()))
        })
    }

    /// Render `page` as a response, draining the session's flash notices.
    ///
    /// `extra` is serialized into the template context alongside the
    /// layout values.
    pub fn respond<T: Serialize>(
        &self,
        status: StatusCode,
        page: Page,
        session: &SessionContext,
        extra: &T,
    ) -> Result<HttpResponse, Error> {
        let mut context = Context::from_serialize(extra).map_err(|err| {
            error!(error = ?err, "page context did not serialize");
            Error::internal("failed to build page context")
        })?;
        context.insert("logged_in", &session.user_id()?.is_some());
        context.insert("flashes", &session.take_flashes());
        let body = self.render(page, &context)?;
        Ok(HttpResponse::build(status)
            .content_type(ContentType::html())
            .body(body))
    }
}

/// Empty context for pages with no values of their own.
#[derive(Debug, Default, Serialize)]
pub struct NoContext {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::session::{Flash, FlashLevel};
    use rstest::{fixture, rstest};

    #[fixture]
    fn views() -> Views {
        Views::new().expect("templates compile")
    }

    fn layout(logged_in: bool, flashes: Vec<Flash>) -> Context {
        let mut context = Context::new();
        context.insert("logged_in", &logged_in);
        context.insert("flashes", &flashes);
        context
    }

    #[rstest]
    #[case(Page::Index)]
    #[case(Page::Register)]
    #[case(Page::Login)]
    #[case(Page::Upload)]
    #[case(Page::ExtractedData)]
    fn pages_render_with_layout_only(views: Views, #[case] page: Page) {
        let mut context = layout(false, Vec::new());
        context.insert("max_upload_mb", &50);
        context.insert("documents", &Vec::<String>::new());
        let html = views.render(page, &context).expect("renders");
        assert!(html.contains("<nav>"));
    }

    #[rstest]
    fn flashes_render_with_level_class(views: Views) {
        let context = layout(
            false,
            vec![Flash::new(FlashLevel::Danger, "Invalid credentials!")],
        );
        let html = views.render(Page::Login, &context).expect("renders");
        assert!(html.contains(r#"class="flash flash-danger">Invalid credentials!"#));
    }

    #[rstest]
    fn extracted_text_is_escaped(views: Views) {
        let mut context = layout(true, Vec::new());
        context.insert("filename", "doc.pdf");
        context.insert("text", "<script>alert(1)</script>");
        let html = views.render(Page::ExtractedText, &context).expect("renders");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[rstest]
    fn navigation_follows_login_state(views: Views) {
        let anonymous = views
            .render(Page::Index, &layout(false, Vec::new()))
            .expect("renders");
        let signed_in = views
            .render(Page::Index, &layout(true, Vec::new()))
            .expect("renders");
        assert!(anonymous.contains(r#"href="/login""#));
        assert!(signed_in.contains(r#"href="/logout""#));
    }
}

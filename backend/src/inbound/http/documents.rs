//! Upload form, upload submission, and the extracted data listing.
//!
//! The upload body is read field by field with a running size check so an
//! oversized file is rejected without buffering all of it.

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, get, http::StatusCode, post, web};
use futures_util::TryStreamExt;
use serde::Serialize;
use tracing::warn;

use super::gate::AuthenticatedUser;
use super::session::{FlashLevel, SessionContext};
use super::state::HttpState;
use super::views::Page;
use crate::domain::ports::UploadRequest;
use crate::domain::{Error, ErrorCode, ExtractedDocument};
use crate::inbound::http::ApiResult;

/// Multipart field carrying the file.
pub const FILE_FIELD: &str = "file";
pub const UPLOAD_SUCCEEDED: &str = "File uploaded and text extracted successfully!";

const BYTES_PER_MIB: usize = 1024 * 1024;
const UPLOADED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

#[derive(Debug, Serialize)]
struct UploadFormContext {
    max_upload_mb: usize,
}

#[derive(Debug, Serialize)]
struct ExtractedTextContext<'a> {
    filename: &'a str,
    text: String,
}

#[derive(Debug, Serialize)]
struct DocumentRow {
    filename: String,
    uploaded_at: String,
    text: String,
}

impl From<&ExtractedDocument> for DocumentRow {
    fn from(document: &ExtractedDocument) -> Self {
        Self {
            filename: document.filename().to_string(),
            uploaded_at: document.uploaded_at().format(UPLOADED_AT_FORMAT).to_string(),
            text: document.outcome().display_text(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ExtractedDataContext {
    documents: Vec<DocumentRow>,
}

/// File pulled out of the multipart body.
#[derive(Debug, Default)]
struct SubmittedFile {
    filename: String,
    bytes: Vec<u8>,
}

fn malformed_upload(err: impl std::fmt::Display) -> Error {
    warn!(error = %err, "malformed multipart upload");
    Error::invalid_request("malformed upload")
}

async fn read_field(field: &mut Field, limit: usize) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed_upload)? {
        if bytes.len() + chunk.len() > limit {
            return Err(Error::payload_too_large(format!(
                "uploads are limited to {} MB",
                limit / BYTES_PER_MIB
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Read the `file` field, skipping any others.
///
/// A body without a `file` field yields an empty filename, which the upload
/// service rejects as a missing file.
async fn read_submitted_file(mut payload: Multipart, limit: usize) -> Result<SubmittedFile, Error> {
    while let Some(mut field) = payload.try_next().await.map_err(malformed_upload)? {
        if field.name() != Some(FILE_FIELD) {
            while field.try_next().await.map_err(malformed_upload)?.is_some() {}
            continue;
        }
        let filename = field
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .unwrap_or_default()
            .to_owned();
        let bytes = read_field(&mut field, limit).await?;
        return Ok(SubmittedFile { filename, bytes });
    }
    Ok(SubmittedFile::default())
}

fn upload_form_context(state: &HttpState) -> UploadFormContext {
    UploadFormContext {
        max_upload_mb: state.max_upload_bytes / BYTES_PER_MIB,
    }
}

#[get("/upload")]
pub async fn upload_form(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    state.views.respond(
        StatusCode::OK,
        Page::Upload,
        &session,
        &upload_form_context(&state),
    )
}

/// Accept one PDF, extract its text, and show the result.
#[post("/upload")]
pub async fn upload(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let submitted = match read_submitted_file(payload, state.max_upload_bytes).await {
        Ok(submitted) => submitted,
        Err(err) => return rerender_upload_form(&state, &session, err),
    };

    let request = UploadRequest {
        uploaded_by: user.0,
        filename: submitted.filename,
        bytes: submitted.bytes,
    };
    let document = match state.uploads.upload(request).await {
        Ok(document) => document,
        Err(err) => return rerender_upload_form(&state, &session, err),
    };

    session.push_flash(FlashLevel::Success, UPLOAD_SUCCEEDED)?;
    let context = ExtractedTextContext {
        filename: document.filename().as_ref(),
        text: document.outcome().display_text(),
    };
    state
        .views
        .respond(StatusCode::OK, Page::ExtractedText, &session, &context)
}

/// Show the form again for rejections the visitor can fix; propagate the rest.
fn rerender_upload_form(
    state: &HttpState,
    session: &SessionContext,
    err: Error,
) -> ApiResult<HttpResponse> {
    let status = match err.code() {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        _ => return Err(err),
    };
    session.push_flash(FlashLevel::Danger, err.message())?;
    state
        .views
        .respond(status, Page::Upload, session, &upload_form_context(state))
}

/// Every stored record, oldest first.
#[get("/extracted_data")]
pub async fn extracted_data(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let documents = state.documents.list_all().await?;
    let context = ExtractedDataContext {
        documents: documents.iter().map(DocumentRow::from).collect(),
    };
    state
        .views
        .respond(StatusCode::OK, Page::ExtractedData, &session, &context)
}

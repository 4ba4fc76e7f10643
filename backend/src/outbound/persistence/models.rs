//! Internal Diesel row structs. Never exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{extracted_data, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = extracted_data)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExtractedDataRow {
    pub id: i64,
    pub filename: String,
    pub outcome: String,
    pub content: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = extracted_data)]
pub(crate) struct NewExtractedDataRow<'a> {
    pub filename: &'a str,
    pub outcome: &'a str,
    pub content: &'a str,
    pub uploaded_at: DateTime<Utc>,
}

//! Diesel table definitions; must match `backend/migrations` exactly.

diesel::table! {
    /// Registered accounts. `email` carries a unique constraint.
    users (id) {
        id -> Uuid,
        #[max_length = 100]
        name -> Varchar,
        #[max_length = 150]
        email -> Varchar,
        #[max_length = 256]
        password_hash -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Extraction results in insertion order.
    extracted_data (id) {
        id -> Int8,
        #[max_length = 255]
        filename -> Varchar,
        /// One of `extracted`, `empty`, `failed`.
        #[max_length = 16]
        outcome -> Varchar,
        /// Extracted text or failure reason; empty for `empty`.
        content -> Text,
        uploaded_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, extracted_data);

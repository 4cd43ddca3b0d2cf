//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` against a migrated database when the schema changes.

diesel::table! {
    /// Service providers.
    ///
    /// `longitude` and `latitude` are both NULL or both set (checked by the
    /// `providers_position_pair` constraint).
    providers (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        name -> Text,
        mobile -> Text,
        /// Opaque stored-path string from the upload collaborator.
        profile_image -> Text,
        category -> Text,
        longitude -> Nullable<Float8>,
        latitude -> Nullable<Float8>,
        address -> Text,
        /// Full-precision mean of the provider's reviews.
        rating -> Float8,
        /// Incremented by every aggregate rating write.
        rating_revision -> Int4,
        price -> Float8,
        description -> Text,
        availability -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Requesters and their last saved position.
    requesters (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        name -> Text,
        profile_image -> Text,
        longitude -> Nullable<Float8>,
        latitude -> Nullable<Float8>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One rating per (provider, requester) pair.
    reviews (provider_id, requester_id) {
        provider_id -> Uuid,
        requester_id -> Uuid,
        /// Rating in `1..=5`.
        rating -> Int2,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(reviews -> providers (provider_id));
diesel::joinable!(reviews -> requesters (requester_id));

diesel::allow_tables_to_appear_in_same_query!(providers, requesters, reviews);

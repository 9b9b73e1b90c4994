//! Diesel table definitions matching `backend/migrations`.

diesel::table! {
    /// Selection history per city.
    ///
    /// A partial unique index on `city_id WHERE is_active` allows at most one
    /// active row per city. Inactive rows are kept as history.
    boundary_selections (id) {
        id -> Uuid,
        city_id -> Text,
        /// `way/<id>` or `relation/<id>`.
        composite_id -> Text,
        element_kind -> Text,
        /// Serialised `ResolvedBoundary`, geometry included.
        boundary -> Jsonb,
        selected_by -> Text,
        selected_at -> Timestamptz,
        is_active -> Bool,
        deactivated_at -> Nullable<Timestamptz>,
    }
}

// Diesel table definitions. Timestamps are fixed-width RFC 3339 UTC text.

diesel::table! {
    items (id) {
        id -> Text,
        title -> Text,
        link -> Text,
        images -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    item_sources (source_id) {
        source_id -> Text,
        source -> Text,
        item_id -> Text,
    }
}

diesel::table! {
    prices (id) {
        id -> Integer,
        item_id -> Text,
        date -> Text,
        currency -> Text,
        price -> Double,
    }
}

diesel::joinable!(item_sources -> items (item_id));
diesel::joinable!(prices -> items (item_id));

diesel::allow_tables_to_appear_in_same_query!(items, item_sources, prices);

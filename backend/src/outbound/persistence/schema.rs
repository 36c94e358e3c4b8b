//! Diesel table definitions for the storefront schema.
//!
//! `users.national_id` carries a unique index; the user repository relies on
//! the resulting unique-violation error to resolve concurrent creates.

diesel::table! {
    orders (id) {
        id -> Int8,
        user_id -> Int8,
        item_description -> Varchar,
        item_quantity -> Int4,
        item_price -> Float8,
        total_value -> Float8,
        created_at -> Timestamptz,
        updated_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    users (id) {
        id -> Int8,
        name -> Varchar,
        national_id -> Varchar,
        email -> Varchar,
        phone_number -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Nullable<Timestamptz>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(orders, users);

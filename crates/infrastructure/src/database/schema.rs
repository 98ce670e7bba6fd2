// Database schema for the bookstore
diesel::table! {
    users (user_id) {
        user_id -> Integer,
        username -> Text,
        password -> Text,
        email -> Text,
        usertype -> Text,          // customer, admin
    }
}

diesel::table! {
    books (book_id) {
        book_id -> Integer,
        book_name -> Text,
        author -> Text,
        price -> Integer,          // Live price
        inventory -> Integer,      // Units in stock
    }
}

diesel::table! {
    orders (order_id) {
        order_id -> Integer,
        user_id -> Nullable<Integer>,
        time -> Timestamp,
        status -> Text,            // pending, confirmed, ..., cancelled
    }
}

diesel::table! {
    order_items (order_item_id) {
        order_item_id -> Integer,
        book_id -> Nullable<Integer>,
        order_id -> Integer,
        amount -> Integer,         // Quantity ordered
        price -> Integer,          // Unit price when the order was placed
    }
}

diesel::joinable!(orders -> users (user_id));
diesel::joinable!(order_items -> orders (order_id));
diesel::joinable!(order_items -> books (book_id));

diesel::allow_tables_to_appear_in_same_query!(users, books, orders, order_items,);

/// Creates the tables above when they do not exist yet.
pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS users (
    user_id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    usertype TEXT NOT NULL DEFAULT 'customer'
);
CREATE TABLE IF NOT EXISTS books (
    book_id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    book_name TEXT NOT NULL,
    author TEXT NOT NULL DEFAULT '',
    price INTEGER NOT NULL CHECK (price >= 0),
    inventory INTEGER NOT NULL CHECK (inventory >= 0)
);
CREATE TABLE IF NOT EXISTS orders (
    order_id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    user_id INTEGER REFERENCES users (user_id),
    time TIMESTAMP NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending'
);
CREATE TABLE IF NOT EXISTS order_items (
    order_item_id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    book_id INTEGER REFERENCES books (book_id),
    order_id INTEGER NOT NULL REFERENCES orders (order_id),
    amount INTEGER NOT NULL,
    price INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS order_items_order_id ON order_items (order_id);
";

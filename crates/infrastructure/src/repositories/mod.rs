pub mod sqlite_book_repository;
pub mod sqlite_order_repository;
pub mod sqlite_user_repository;

pub use sqlite_book_repository::SqliteBookRepository;
pub use sqlite_order_repository::SqliteOrderRepository;
pub use sqlite_user_repository::SqliteUserRepository;

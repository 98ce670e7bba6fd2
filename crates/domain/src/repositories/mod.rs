pub mod book_repository;
pub mod order_repository;
pub mod user_repository;

pub use book_repository::BookRepository;
pub use order_repository::OrderRepository;
pub use user_repository::UserRepository;

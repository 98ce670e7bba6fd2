use thiserror::Error;

use crate::entities::OrderStatus;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// An order aggregate is missing a reference it must carry (user or book).
    #[error("Broken order aggregate: {0}")]
    BrokenAggregate(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("User not found with id: {0}")]
    UserNotFound(i32),

    #[error("Book not found with id: {0}")]
    BookNotFound(i32),

    #[error("Order not found with id: {0}")]
    OrderNotFound(i32),

    #[error("Username already exists: {0}")]
    UsernameAlreadyExists(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Insufficient stock for book {book_id}: requested {requested}, available {available}")]
    InsufficientStock {
        book_id: i32,
        requested: i32,
        available: i32,
    },

    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidStatusChange {
        order_id: i32,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl DomainError {
    /// True for failures that mean the data itself is corrupt rather than the
    /// request being rejected.
    pub fn is_precondition_violation(&self) -> bool {
        matches!(self, DomainError::BrokenAggregate(_))
    }
}

use serde::{Deserialize, Serialize};

/// One line of an order, owned by that order.
///
/// `price` and `quantity` are fixed when the order is placed. The book is
/// referenced by id only and resolved through the order aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Option<i32>,
    pub book_id: Option<i32>,
    pub order_id: Option<i32>,
    pub quantity: i32,
    pub price: i32,
}

impl OrderItem {
    pub fn new(book_id: i32, quantity: i32, price: i32) -> Self {
        Self {
            id: None,
            book_id: Some(book_id),
            order_id: None,
            quantity,
            price,
        }
    }

    pub fn line_total(&self) -> i64 {
        i64::from(self.price) * i64::from(self.quantity)
    }
}

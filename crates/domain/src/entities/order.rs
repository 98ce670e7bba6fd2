use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Book, OrderItem, OrderStatus, User};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Option<i32>,
    pub user_id: Option<i32>,
    pub time: NaiveDateTime, // UTC
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn new(user_id: i32, time: NaiveDateTime, items: Vec<OrderItem>) -> Self {
        Self {
            id: None,
            user_id: Some(user_id),
            time,
            status: OrderStatus::Pending,
            items,
        }
    }

    pub fn total_price(&self) -> i64 {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Quantity per book summed across items, first occurrence order.
    pub fn quantities_per_book(&self) -> Vec<(i32, i32)> {
        let mut quantities: Vec<(i32, i32)> = Vec::new();
        for item in &self.items {
            let Some(book_id) = item.book_id else { continue };
            match quantities.iter_mut().find(|(id, _)| *id == book_id) {
                Some((_, total)) => *total = total.saturating_add(item.quantity),
                None => quantities.push((book_id, item.quantity)),
            }
        }
        quantities
    }

    /// Ids of every book referenced by the items, first occurrence order.
    pub fn book_ids(&self) -> Vec<i32> {
        let mut ids = Vec::new();
        for book_id in self.items.iter().filter_map(|item| item.book_id) {
            if !ids.contains(&book_id) {
                ids.push(book_id);
            }
        }
        ids
    }
}

/// An order together with the entities it points at.
///
/// Items and the order refer to users and books by id; those ids are
/// resolved through the maps held here instead of through object links.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderAggregate {
    pub order: Order,
    pub users: HashMap<i32, User>,
    pub books: HashMap<i32, Book>,
}

impl OrderAggregate {
    pub fn new(order: Order) -> Self {
        Self {
            order,
            users: HashMap::new(),
            books: HashMap::new(),
        }
    }

    pub fn with_user(mut self, user: User) -> Self {
        if let Some(id) = user.id() {
            self.users.insert(id, user);
        }
        self
    }

    pub fn with_book(mut self, book: Book) -> Self {
        if let Some(id) = book.id {
            self.books.insert(id, book);
        }
        self
    }

    pub fn user(&self) -> Option<&User> {
        let user_id = self.order.user_id?;
        self.users.get(&user_id)
    }

    pub fn book(&self, book_id: i32) -> Option<&Book> {
        self.books.get(&book_id)
    }
}

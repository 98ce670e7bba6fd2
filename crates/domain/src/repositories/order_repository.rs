use crate::entities::{Order, OrderAggregate, OrderStatus};
use crate::errors::DomainError;
use async_trait::async_trait;

/// Orders are read back as aggregates: the order, its items, and the user and
/// books they reference.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn get_order(&self, id: i32) -> Result<Option<OrderAggregate>, DomainError>;
    async fn find_by_user(&self, user_id: i32) -> Result<Vec<OrderAggregate>, DomainError>;
    async fn find_all(&self) -> Result<Vec<OrderAggregate>, DomainError>;
    /// Persists the order and all of its items, assigning their ids.
    async fn save(&self, order: &Order) -> Result<Order, DomainError>;
    async fn update_status(&self, id: i32, status: OrderStatus) -> Result<(), DomainError>;
    /// Removes the order together with its items.
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

use crate::dto::{NewOrderRequest, OrderSummary};
use crate::entities::{Book, Order, OrderAggregate, OrderItem, OrderStatus};
use crate::errors::DomainError;
use crate::repositories::{BookRepository, OrderRepository, UserRepository};
use chrono::{NaiveDateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Order placement and retrieval.
///
/// Handles: resolve books → check stock → snapshot prices → save → take stock → summarise
pub struct OrderService {
    user_repository: Arc<dyn UserRepository>,
    book_repository: Arc<dyn BookRepository>,
    order_repository: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        book_repository: Arc<dyn BookRepository>,
        order_repository: Arc<dyn OrderRepository>,
    ) -> Self {
        Self {
            user_repository,
            book_repository,
            order_repository,
        }
    }

    /// Place an order stamped with the current UTC time.
    pub async fn place_order(
        &self,
        user_id: i32,
        request: &NewOrderRequest,
    ) -> Result<OrderSummary, DomainError> {
        self.place_order_at(user_id, request, Utc::now().naive_utc())
            .await
    }

    /// Place an order stamped with `time`.
    ///
    /// Nothing is written unless every line passes: the user exists, each
    /// quantity is positive, each book exists and has enough stock for the
    /// sum of its lines. The order is saved before stock is taken; if taking
    /// stock fails the order is deleted again and stock already taken is
    /// put back.
    pub async fn place_order_at(
        &self,
        user_id: i32,
        request: &NewOrderRequest,
        time: NaiveDateTime,
    ) -> Result<OrderSummary, DomainError> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        if request.is_empty() {
            return Err(DomainError::ValidationError(
                "Order must contain at least one item".to_string(),
            ));
        }

        // Requested quantity per book, in first-seen order
        let mut requested: Vec<(i32, i32)> = Vec::new();
        for line in &request.order_item_list {
            if line.book_number <= 0 {
                return Err(DomainError::ValidationError(format!(
                    "Quantity for book {} must be positive, got {}",
                    line.book_id, line.book_number
                )));
            }
            match requested.iter_mut().find(|(id, _)| *id == line.book_id) {
                Some((_, total)) => {
                    *total = total.checked_add(line.book_number).ok_or_else(|| {
                        DomainError::ValidationError("Quantity overflow".to_string())
                    })?
                }
                None => requested.push((line.book_id, line.book_number)),
            }
        }

        let mut books: HashMap<i32, Book> = HashMap::new();
        for &(book_id, quantity) in &requested {
            let book = self
                .book_repository
                .find_by_id(book_id)
                .await?
                .ok_or(DomainError::BookNotFound(book_id))?;

            if !book.has_stock(quantity) {
                warn!(book_id, requested = quantity, available = book.stock, "insufficient stock");
                return Err(DomainError::InsufficientStock {
                    book_id,
                    requested: quantity,
                    available: book.stock,
                });
            }
            books.insert(book_id, book);
        }

        // Prices are snapshotted here, before any later catalogue change
        let items: Vec<OrderItem> = request
            .order_item_list
            .iter()
            .filter_map(|line| {
                books
                    .get(&line.book_id)
                    .map(|book| OrderItem::new(line.book_id, line.book_number, book.price))
            })
            .collect();

        let order = self
            .order_repository
            .save(&Order::new(user_id, time, items))
            .await?;

        let taken: Vec<(i32, i32)> = requested
            .iter()
            .map(|&(book_id, quantity)| (book_id, -quantity))
            .collect();
        let books = match self.apply_stock_changes(&taken).await {
            Ok(books) => books,
            Err(err) => {
                if let Some(order_id) = order.id {
                    if let Err(delete_err) = self.order_repository.delete(order_id).await {
                        warn!(order_id, error = %delete_err, "failed to remove unfilled order");
                    }
                }
                return Err(err);
            }
        };

        info!(
            order_id = ?order.id,
            user_id,
            items = order.items.len(),
            total = order.total_price(),
            "order placed"
        );

        let aggregate = books
            .into_iter()
            .fold(OrderAggregate::new(order).with_user(user), |agg, book| {
                agg.with_book(book)
            });
        OrderSummary::build(&aggregate)
    }

    pub async fn order_summary(&self, order_id: i32) -> Result<OrderSummary, DomainError> {
        let aggregate = self
            .order_repository
            .get_order(order_id)
            .await?
            .ok_or(DomainError::OrderNotFound(order_id))?;

        OrderSummary::build(&aggregate)
    }

    /// Summaries of one user's orders, newest first.
    pub async fn orders_for_user(&self, user_id: i32) -> Result<Vec<OrderSummary>, DomainError> {
        let aggregates = self.order_repository.find_by_user(user_id).await?;
        Self::summarise_newest_first(aggregates)
    }

    /// Summaries of every order, newest first.
    pub async fn all_order_summaries(&self) -> Result<Vec<OrderSummary>, DomainError> {
        let aggregates = self.order_repository.find_all().await?;
        Self::summarise_newest_first(aggregates)
    }

    /// Move an order to `status`.
    ///
    /// Closing an order (cancelled or returned) puts its stock back. Closed
    /// orders never change again, and a delivered order can be returned but
    /// not cancelled.
    pub async fn update_status(
        &self,
        order_id: i32,
        status: OrderStatus,
    ) -> Result<Order, DomainError> {
        let aggregate = self
            .order_repository
            .get_order(order_id)
            .await?
            .ok_or(DomainError::OrderNotFound(order_id))?;
        let mut order = aggregate.order;
        let from = order.status;

        if !from.can_become(status) {
            return Err(DomainError::InvalidStatusChange {
                order_id,
                from,
                to: status,
            });
        }

        // Books no longer in the catalogue have nothing to return to
        let restored: Vec<(i32, i32)> = if from.holds_stock() && !status.holds_stock() {
            order
                .quantities_per_book()
                .into_iter()
                .filter(|(book_id, _)| aggregate.books.contains_key(book_id))
                .collect()
        } else {
            Vec::new()
        };
        self.apply_stock_changes(&restored).await?;

        if let Err(err) = self.order_repository.update_status(order_id, status).await {
            self.revert_stock_changes(&restored).await;
            return Err(err);
        }

        order.status = status;
        info!(order_id, %from, to = %status, "order status changed");
        Ok(order)
    }

    pub async fn cancel_order(&self, order_id: i32) -> Result<Order, DomainError> {
        self.update_status(order_id, OrderStatus::Cancelled).await
    }

    pub async fn return_order(&self, order_id: i32) -> Result<Order, DomainError> {
        self.update_status(order_id, OrderStatus::Returned).await
    }

    pub async fn delete_order(&self, order_id: i32) -> Result<(), DomainError> {
        if self.order_repository.get_order(order_id).await?.is_none() {
            return Err(DomainError::OrderNotFound(order_id));
        }

        self.order_repository.delete(order_id).await?;
        info!(order_id, "order deleted");
        Ok(())
    }

    /// Apply `(book id, delta)` stock changes in order. When one fails, the
    /// changes already applied are reverted before the error is returned.
    async fn apply_stock_changes(&self, changes: &[(i32, i32)]) -> Result<Vec<Book>, DomainError> {
        let mut updated = Vec::with_capacity(changes.len());
        for (applied, &(book_id, delta)) in changes.iter().enumerate() {
            match self.change_stock(book_id, delta).await {
                Ok(book) => updated.push(book),
                Err(err) => {
                    self.revert_stock_changes(&changes[..applied]).await;
                    return Err(err);
                }
            }
        }
        Ok(updated)
    }

    async fn revert_stock_changes(&self, changes: &[(i32, i32)]) {
        for &(book_id, delta) in changes.iter().rev() {
            if let Err(err) = self.change_stock(book_id, -delta).await {
                warn!(book_id, delta, error = %err, "failed to revert stock change");
            }
        }
    }

    async fn change_stock(&self, book_id: i32, delta: i32) -> Result<Book, DomainError> {
        let mut book = self
            .book_repository
            .find_by_id(book_id)
            .await?
            .ok_or(DomainError::BookNotFound(book_id))?;

        let stock = book.stock.checked_add(delta).ok_or_else(|| {
            DomainError::ValidationError(format!("Stock overflow for book {}", book_id))
        })?;
        if stock < 0 {
            return Err(DomainError::InsufficientStock {
                book_id,
                requested: -delta,
                available: book.stock,
            });
        }

        book.stock = stock;
        self.book_repository.update(&book).await
    }

    fn summarise_newest_first(
        mut aggregates: Vec<OrderAggregate>,
    ) -> Result<Vec<OrderSummary>, DomainError> {
        aggregates.sort_by(|a, b| {
            b.order
                .time
                .cmp(&a.order.time)
                .then_with(|| b.order.id.cmp(&a.order.id))
        });
        aggregates.iter().map(OrderSummary::build).collect()
    }
}

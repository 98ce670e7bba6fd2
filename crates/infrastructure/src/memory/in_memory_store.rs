use async_trait::async_trait;
use domain::{
    Book, BookRepository, DomainError, Order, OrderAggregate, OrderRepository, OrderStatus, User,
    UserRepository,
};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Id-keyed tables. Orders own their items; everything else is linked by id.
#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    books: BTreeMap<i32, Book>,
    orders: BTreeMap<i32, Order>,
    last_user_id: i32,
    last_book_id: i32,
    last_order_id: i32,
    last_order_item_id: i32,
}

impl Tables {
    fn aggregate(&self, order: &Order) -> OrderAggregate {
        let mut aggregate = OrderAggregate::new(order.clone());

        if let Some(user) = order.user_id.and_then(|id| self.users.get(&id)) {
            aggregate = aggregate.with_user(user.clone());
        }
        for book_id in order.book_ids() {
            if let Some(book) = self.books.get(&book_id) {
                aggregate = aggregate.with_book(book.clone());
            }
        }

        aggregate
    }
}

/// Storage backend that keeps every table in process memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;
        tables.last_user_id += 1;
        let user_id = tables.last_user_id;
        let saved = user.persisted(user_id);
        tables.users.insert(user_id, saved.clone());
        Ok(saved)
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }
}

#[async_trait]
impl BookRepository for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        Ok(self.tables.read().await.books.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Book>, DomainError> {
        Ok(self.tables.read().await.books.values().cloned().collect())
    }

    async fn save(&self, book: &Book) -> Result<Book, DomainError> {
        let mut tables = self.tables.write().await;
        tables.last_book_id += 1;
        let book_id = tables.last_book_id;
        let saved = Book {
            id: Some(book_id),
            ..book.clone()
        };
        tables.books.insert(book_id, saved.clone());
        Ok(saved)
    }

    async fn update(&self, book: &Book) -> Result<Book, DomainError> {
        let book_id = book.id.ok_or_else(|| {
            DomainError::ValidationError("Book ID is required for updates".to_string())
        })?;

        let mut tables = self.tables.write().await;
        let stored = tables
            .books
            .get_mut(&book_id)
            .ok_or(DomainError::BookNotFound(book_id))?;
        *stored = book.clone();
        Ok(stored.clone())
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn get_order(&self, id: i32) -> Result<Option<OrderAggregate>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.orders.get(&id).map(|order| tables.aggregate(order)))
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Vec<OrderAggregate>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .values()
            .filter(|order| order.user_id == Some(user_id))
            .map(|order| tables.aggregate(order))
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<OrderAggregate>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .values()
            .map(|order| tables.aggregate(order))
            .collect())
    }

    async fn save(&self, order: &Order) -> Result<Order, DomainError> {
        let mut tables = self.tables.write().await;
        tables.last_order_id += 1;
        let order_id = tables.last_order_id;

        let mut saved = order.clone();
        saved.id = Some(order_id);
        for item in &mut saved.items {
            tables.last_order_item_id += 1;
            item.id = Some(tables.last_order_item_id);
            item.order_id = Some(order_id);
        }

        tables.orders.insert(order_id, saved.clone());
        Ok(saved)
    }

    async fn update_status(&self, id: i32, status: OrderStatus) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        let order = tables
            .orders
            .get_mut(&id)
            .ok_or(DomainError::OrderNotFound(id))?;
        order.status = status;
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        self.tables.write().await.orders.remove(&id);
        Ok(())
    }
}

use config::{Config, StorageBackend};
use domain::{
    BookRepository, BookService, DomainError, NewOrderRequest, NewUserRequest, OrderRepository,
    OrderService, OrderSummary, User, UserRepository, UserService,
};
use infrastructure::{
    Database, InMemoryStore, SqliteBookRepository, SqliteOrderRepository, SqliteUserRepository,
};
use std::sync::Arc;
use tracing::info;

/// Bookstore Application - wires a storage backend to the domain services
pub struct BookstoreApp {
    pub user_service: UserService,
    pub book_service: BookService,
    pub order_service: OrderService,
}

impl BookstoreApp {
    /// Build the app on the backend named in `config`.
    pub fn new(config: &Config) -> Result<Self, DomainError> {
        info!(storage = %config.storage, "starting bookstore");

        match config.storage {
            StorageBackend::Memory => Ok(Self::in_memory()),
            StorageBackend::Sqlite => {
                // Infrastructure layer - database setup
                let database = Database::new(&config.database_url, config.max_connections)?;
                Ok(Self::with_sqlite(&database))
            }
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::with_repositories(store.clone(), store.clone(), store)
    }

    pub fn with_sqlite(database: &Database) -> Self {
        let pool = database.get_pool().clone();

        Self::with_repositories(
            Arc::new(SqliteUserRepository::new(pool.clone())),
            Arc::new(SqliteBookRepository::new(pool.clone())),
            Arc::new(SqliteOrderRepository::new(pool)),
        )
    }

    pub fn with_repositories(
        user_repository: Arc<dyn UserRepository>,
        book_repository: Arc<dyn BookRepository>,
        order_repository: Arc<dyn OrderRepository>,
    ) -> Self {
        // Domain services
        let user_service = UserService::new(user_repository.clone());
        let book_service = BookService::new(book_repository.clone());
        let order_service = OrderService::new(user_repository, book_repository, order_repository);

        Self {
            user_service,
            book_service,
            order_service,
        }
    }

    /// Register a user from a JSON registration payload.
    pub async fn register_user(&self, request: NewUserRequest) -> Result<User, DomainError> {
        self.user_service.register(request).await
    }

    /// Place an order for `user_id` and return its summary.
    pub async fn place_order(
        &self,
        user_id: i32,
        request: &NewOrderRequest,
    ) -> Result<OrderSummary, DomainError> {
        self.order_service.place_order(user_id, request).await
    }

    pub async fn order_summary(&self, order_id: i32) -> Result<OrderSummary, DomainError> {
        self.order_service.order_summary(order_id).await
    }
}

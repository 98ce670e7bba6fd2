use crate::entities::Book;
use crate::errors::DomainError;
use crate::repositories::BookRepository;
use std::sync::Arc;
use tracing::info;

/// Catalogue maintenance: adding books and changing their live data.
pub struct BookService {
    book_repository: Arc<dyn BookRepository>,
}

impl BookService {
    pub fn new(book_repository: Arc<dyn BookRepository>) -> Self {
        Self { book_repository }
    }

    pub async fn add_book(
        &self,
        name: String,
        author: String,
        price: i32,
        stock: i32,
    ) -> Result<Book, DomainError> {
        let book = Book::new(name, author, price, stock);
        book.validate()?;

        let saved = self.book_repository.save(&book).await?;
        info!(book_id = ?saved.id, name = %saved.name, "book added");
        Ok(saved)
    }

    pub async fn get_book(&self, id: i32) -> Result<Book, DomainError> {
        self.book_repository
            .find_by_id(id)
            .await?
            .ok_or(DomainError::BookNotFound(id))
    }

    pub async fn list_books(&self) -> Result<Vec<Book>, DomainError> {
        self.book_repository.find_all().await
    }

    /// Change the live price. Orders already placed keep the price they were
    /// placed at.
    pub async fn update_price(&self, id: i32, price: i32) -> Result<Book, DomainError> {
        let mut book = self.get_book(id).await?;
        book.price = price;
        book.validate()?;

        info!(book_id = id, price, "book price updated");
        self.book_repository.update(&book).await
    }

    pub async fn rename_book(&self, id: i32, name: String) -> Result<Book, DomainError> {
        let mut book = self.get_book(id).await?;
        book.name = name;
        book.validate()?;

        self.book_repository.update(&book).await
    }

    /// Adjust stock by `delta`, which may be negative as long as stock stays
    /// non-negative.
    pub async fn restock(&self, id: i32, delta: i32) -> Result<Book, DomainError> {
        let mut book = self.get_book(id).await?;
        book.stock = book
            .stock
            .checked_add(delta)
            .ok_or_else(|| DomainError::ValidationError("Stock overflow".to_string()))?;
        book.validate()?;

        self.book_repository.update(&book).await
    }
}

use crate::entities::Book;
use crate::errors::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError>;
    async fn find_all(&self) -> Result<Vec<Book>, DomainError>;
    async fn save(&self, book: &Book) -> Result<Book, DomainError>;
    async fn update(&self, book: &Book) -> Result<Book, DomainError>;
}

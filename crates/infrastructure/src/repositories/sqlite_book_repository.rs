use crate::database::{books, last_insert_id, run_blocking, SqlitePool};
use async_trait::async_trait;
use diesel::prelude::*;
use domain::{Book, BookRepository, DomainError};

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct BookModel {
    pub(crate) book_id: i32,
    pub(crate) book_name: String,
    pub(crate) author: String,
    pub(crate) price: i32,
    pub(crate) inventory: i32,
}

#[derive(Insertable)]
#[diesel(table_name = books)]
struct NewBookModel {
    book_name: String,
    author: String,
    price: i32,
    inventory: i32,
}

impl From<BookModel> for Book {
    fn from(model: BookModel) -> Self {
        Book::with_id(
            model.book_id,
            model.book_name,
            model.author,
            model.price,
            model.inventory,
        )
    }
}

impl From<&Book> for NewBookModel {
    fn from(book: &Book) -> Self {
        NewBookModel {
            book_name: book.name.clone(),
            author: book.author.clone(),
            price: book.price,
            inventory: book.stock,
        }
    }
}

pub struct SqliteBookRepository {
    pool: SqlitePool,
}

impl SqliteBookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for SqliteBookRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        let result = run_blocking(&self.pool, move |conn| {
            books::table
                .filter(books::book_id.eq(id))
                .select(BookModel::as_select())
                .first::<BookModel>(conn)
                .optional()
        })
        .await?;

        Ok(result.map(|model| model.into()))
    }

    async fn find_all(&self) -> Result<Vec<Book>, DomainError> {
        let result = run_blocking(&self.pool, move |conn| {
            books::table
                .order(books::book_id.asc())
                .select(BookModel::as_select())
                .load::<BookModel>(conn)
        })
        .await?;

        Ok(result.into_iter().map(|model| model.into()).collect())
    }

    async fn save(&self, book: &Book) -> Result<Book, DomainError> {
        let new_book = NewBookModel::from(book);

        let result = run_blocking(&self.pool, move |conn| {
            diesel::insert_into(books::table)
                .values(&new_book)
                .execute(conn)?;
            let book_id = last_insert_id(conn)?;

            books::table
                .filter(books::book_id.eq(book_id))
                .select(BookModel::as_select())
                .first::<BookModel>(conn)
        })
        .await?;

        Ok(result.into())
    }

    async fn update(&self, book: &Book) -> Result<Book, DomainError> {
        let book_id = book.id.ok_or_else(|| {
            DomainError::ValidationError("Book ID is required for updates".to_string())
        })?;
        let changes = NewBookModel::from(book);

        let result = run_blocking(&self.pool, move |conn| {
            diesel::update(books::table.filter(books::book_id.eq(book_id)))
                .set((
                    books::book_name.eq(changes.book_name),
                    books::author.eq(changes.author),
                    books::price.eq(changes.price),
                    books::inventory.eq(changes.inventory),
                ))
                .execute(conn)?;

            // Fetch the updated book
            books::table
                .filter(books::book_id.eq(book_id))
                .select(BookModel::as_select())
                .first::<BookModel>(conn)
                .optional()
        })
        .await?;

        result
            .map(Book::from)
            .ok_or(DomainError::BookNotFound(book_id))
    }
}

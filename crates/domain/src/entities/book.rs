use serde::{Deserialize, Serialize};

/// A catalogue entry. `price` is the live price; order items keep their own copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: Option<i32>,
    pub name: String,
    pub author: String,
    pub price: i32,
    pub stock: i32,
}

impl Book {
    pub fn new(name: String, author: String, price: i32, stock: i32) -> Self {
        Self {
            id: None,
            name,
            author,
            price,
            stock,
        }
    }

    pub fn with_id(id: i32, name: String, author: String, price: i32, stock: i32) -> Self {
        Self {
            id: Some(id),
            name,
            author,
            price,
            stock,
        }
    }

    pub fn validate(&self) -> Result<(), crate::DomainError> {
        if self.name.trim().is_empty() {
            return Err(crate::DomainError::ValidationError(
                "Book name cannot be empty".to_string(),
            ));
        }

        if self.price < 0 {
            return Err(crate::DomainError::ValidationError(
                "Book price cannot be negative".to_string(),
            ));
        }

        if self.stock < 0 {
            return Err(crate::DomainError::ValidationError(
                "Book stock cannot be negative".to_string(),
            ));
        }

        Ok(())
    }

    pub fn has_stock(&self, quantity: i32) -> bool {
        self.stock >= quantity
    }
}

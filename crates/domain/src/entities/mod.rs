pub mod book;
pub mod order;
pub mod order_item;
pub mod order_status;
pub mod user;

pub use book::*;
pub use order::*;
pub use order_item::*;
pub use order_status::*;
pub use user::*;

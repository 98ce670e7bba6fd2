pub mod new_order;
pub mod new_user;
pub mod order_summary;

pub use new_order::*;
pub use new_user::*;
pub use order_summary::*;

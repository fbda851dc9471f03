//! Shared type definitions.
//!
//! Newtype wrappers and enums used by every Greenbasket component. All types
//! here serialize with serde and, with the `postgres` feature, bind directly
//! in sqlx queries.

mod category;
mod id;
mod status;
mod subject;

pub use category::ProductCategory;
pub use id::{AddressId, CartId, CartItemId, OrderId, OrderItemId, ProductId, WishlistItemId};
pub use status::OrderStatus;
pub use subject::{SubjectId, SubjectIdError};

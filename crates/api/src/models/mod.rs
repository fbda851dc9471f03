//! Domain models and JSON views.
//!
//! Row structs derive `sqlx::FromRow` and are mapped by the repositories;
//! `*View` structs are the JSON shapes the mobile client consumes
//! (camelCase fields, matching the hooks' expectations).

pub mod address;
pub mod cart;
pub mod order;
pub mod product;
pub mod wishlist;

pub use address::{Address, AddressFields};
pub use cart::{Cart, CartItemView, CartItemWithProduct, CartView};
pub use order::{Order, OrderItem, OrderItemView, OrderView, ShippingAddress};
pub use product::{Product, ProductView};
pub use wishlist::{WishlistItemView, WishlistItemWithProduct};

//! Domain Models
//!
//! Entity structs mirroring the relational schema plus the enums that
//! drive the order lifecycle. Row mapping derives are gated behind the
//! `db` feature so clients without sqlx can still use the types.

pub mod cart;
pub mod order;
pub mod product;
pub mod role;

pub use cart::{Cart, CartItem};
pub use order::{DeliveryMethod, Order, OrderDetail, OrderItem, OrderStatus, PaymentMethod};
pub use product::Product;
pub use role::Role;

//! Cart
//!
//! The per-user open cart: mutable staging area for candidate order
//! line items. Never price-snapshotted: order pricing is fixed by the
//! transfer engine, not here.

pub mod service;

pub use service::CartService;

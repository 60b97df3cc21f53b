//! Orders
//!
//! The order lifecycle engine: cart-to-order transfer with price
//! snapshots, the status state machine, payment confirmation and the
//! periodic delivery scheduler.

pub mod lifecycle;
pub mod payment;
pub mod scheduler;
pub mod transfer;

pub use lifecycle::OrderLifecycle;
pub use payment::PaymentService;
pub use scheduler::{StatusScheduler, TickStats};
pub use transfer::CartTransferEngine;

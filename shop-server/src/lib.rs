//! Shop Server - online shop order and cart backend
//!
//! # Architecture
//!
//! The crate is consumed through in-process service calls; HTTP
//! controllers, catalog management, user registration and the mail/PDF
//! systems are external collaborators behind the seams in `notify` and
//! the repositories.
//!
//! # Module map
//!
//! ```text
//! shop-server/src/
//! ├── core/          # Configuration
//! ├── utils/         # Error taxonomy, logging setup
//! ├── auth/          # Principal and order access policy
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── pricing/       # Discount math and price snapshots
//! ├── cart/          # Per-user open cart
//! ├── orders/        # Transfer, lifecycle, payment, scheduler
//! └── notify/        # Invoice/mail collaborator traits
//! ```

pub mod auth;
pub mod cart;
pub mod core;
pub mod db;
pub mod notify;
pub mod orders;
pub mod pricing;
pub mod utils;

// Re-export public types
pub use auth::Principal;
pub use cart::CartService;
pub use core::Config;
pub use db::DbService;
pub use orders::{CartTransferEngine, OrderLifecycle, PaymentService, StatusScheduler, TickStats};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

//! # meridian-orders: Bill Numbering and Order Creation
//!
//! Issues the human-readable `PPP-NNN` bill numbers printed on receipts and
//! creates orders carrying them.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ServiceConfig::load_or_default(None)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config.db_config()) ──► db.orders()  (OrderStore)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Arc<BillCounter>::initialize(&store, tenant)   once, before traffic    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OrderCreator::from_config(store, counter, &config)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  creator.create(&new_order, &context)  ──► OrderSummary                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`counter`] - The shared bill number allocator
//! - [`creator`] - Order creation flow
//! - [`store`] - Persistence seam (SQLite and in-memory)
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```rust
//! use meridian_orders::{BillCounter, MemoryOrderStore};
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
//! # rt.block_on(async {
//! let store = MemoryOrderStore::new();
//! store.seed_bill_number("tenant-a", Some("012-998"));
//!
//! let counter = BillCounter::default();
//! counter.initialize(&store, "tenant-a").await;
//!
//! assert_eq!(counter.next(), "012-999");
//! assert_eq!(counter.next(), "013-001");
//! # });
//! ```

pub mod config;
pub mod counter;
pub mod creator;
pub mod error;
pub mod store;

pub use config::ServiceConfig;
pub use counter::{BillCounter, CounterStart, DEFAULT_INIT_TIMEOUT};
pub use creator::{OrderContext, OrderCreator};
pub use error::{ConfigError, InitFailure, OrderError, OrderResult};
pub use store::{MemoryOrderStore, OrderStore};

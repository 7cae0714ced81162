//! # candykush-db: Response Cache
//!
//! SQLite cache for REST responses of the Candy Kush POS backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cache Architecture                               │
//! │                                                                         │
//! │  Companion CLI / sync job                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    candykush-db (this crate)                    │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────────┐  ┌──────────────────────┐  ┌───────────────┐  │   │
//! │  │  │  Database   │  │ SalesCacheRepository │  │ ItemsCache    │  │   │
//! │  │  │  (pool)     │  │ (kind,period,key)    │  │ Repository    │  │   │
//! │  │  └─────────────┘  └──────────────────────┘  └───────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (WAL mode) ← cache.db                                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`pool`] - Connection pool and [`Database`] handle
//! - [`migrations`] - Schema creation and destructive upgrades
//! - [`repository`] - Sales and items repositories
//! - [`error`] - Error types

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::{
    CachedItems, CachedPayload, ItemsCacheRepository, SalesCacheRepository, SyncProgress,
};

//! # candykush-core: Pure Domain Logic for the Candy Kush POS Companion
//!
//! This crate holds the domain types shared by the receipt printers and the
//! dated response cache. Everything here is a pure function of its inputs.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Candy Kush Companion Architecture                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/companion (CLI orchestration)              │   │
//! │  └───────────────┬─────────────────────────────────┬───────────────┘   │
//! │                  │                                 │                    │
//! │  ┌───────────────▼───────────────┐  ┌──────────────▼──────────────┐    │
//! │  │       candykush-print         │  │        candykush-db         │    │
//! │  │  raster encoder, PeriPage,    │  │  dated response cache       │    │
//! │  │  text receipts, SmartPos      │  │  (SQLite via sqlx)          │    │
//! │  └───────────────┬───────────────┘  └──────────────┬──────────────┘    │
//! │                  │                                 │                    │
//! │  ┌───────────────▼─────────────────────────────────▼───────────────┐   │
//! │  │             ★ candykush-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌──────┐ │   │
//! │  │   │  money  │  │  types  │  │  cart   │  │ period  │  │format│ │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └─────────┘  └──────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Baht amounts in satang (integer arithmetic)
//! - [`types`] - Quantities and receipt lines
//! - [`cart`] - Cart payloads as served by the cart API
//! - [`period`] - Reporting periods, date keys and date ranges
//! - [`freshness`] - Cache freshness decisions
//! - [`format`] - Thousand-separated number formatting
//! - [`validation`] - Input validation for cache keys
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use candykush_core::{Money, Quantity, ReceiptLine};
//!
//! let line = ReceiptLine::new("Gummy Bears", Quantity::from_units(2), Money::from_satang(4500));
//! assert_eq!(line.line_total.satang(), 9000);
//! assert_eq!(line.line_total.to_string(), "฿90.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod format;
pub mod freshness;
pub mod money;
pub mod period;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem, CartResponse};
pub use error::{CoreError, CoreResult, ValidationError};
pub use freshness::FreshnessPolicy;
pub use money::Money;
pub use period::Period;
pub use types::{Quantity, ReceiptLine};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency symbol printed in front of every amount on receipts.
pub const CURRENCY_SYMBOL: char = '฿';

/// Cache kinds written by the background sync and the dashboard.
///
/// The cache treats kinds as opaque strings; these are the ones the
/// companion itself produces.
pub mod kinds {
    /// Aggregated sales totals for a period.
    pub const SALES_SUMMARY: &str = "sales-summary";
    /// Per-item sales breakdown.
    pub const SALES_BY_ITEM: &str = "sales-by-item";
    /// Per-category sales breakdown.
    pub const SALES_BY_CATEGORY: &str = "sales-by-category";
    /// Per-employee sales breakdown.
    pub const SALES_BY_EMPLOYEE: &str = "sales-by-employee";
    /// Stock levels (singular-key items table).
    pub const ITEMS_STOCK: &str = "items-stock";
}

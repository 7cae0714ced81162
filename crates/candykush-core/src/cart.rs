//! # Cart Payloads
//!
//! Wire types for the cart API that the customer display polls and the
//! receipt printers consume. Amounts arrive as JSON doubles in baht; they are
//! converted to [`Money`] exactly once, when a cart becomes receipt lines.
//!
//! ```text
//! GET /api/cart  ──►  CartResponse { success, cart?, error?, timestamp }
//!                                      │
//!                                      ▼
//!                     Cart { items, discount, tax, total, lastUpdated }
//!                                      │ receipt_lines()
//!                                      ▼
//!                               Vec<ReceiptLine>
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{Quantity, ReceiptLine};

// =============================================================================
// Cart Item
// =============================================================================

/// A single item in the remote cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub product_id: String,
    pub name: String,
    /// Units, or grams for weighed products.
    pub quantity: f64,
    /// Unit price in baht.
    pub price: f64,
    /// Line total in baht after member pricing and discounts.
    pub total: f64,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub variant_id: Option<String>,
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub member_price: Option<f64>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub sold_by: Option<String>,
}

impl CartItem {
    /// Converts the item into a printable receipt line.
    ///
    /// The backend's `total` is kept as the line total rather than being
    /// recomputed, so member prices and discounts print as charged.
    pub fn to_receipt_line(&self) -> CoreResult<ReceiptLine> {
        Ok(ReceiptLine::with_total(
            self.name.clone(),
            Quantity::from_api(self.quantity)?,
            Money::from_api_amount(self.price)?,
            Money::from_api_amount(self.total)?,
        ))
    }
}

// =============================================================================
// Cart Adjustments
// =============================================================================

/// Cart-level discount (`type` is `"percentage"` or `"fixed"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Discount {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub value: f64,
}

/// Cart-level tax.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Tax {
    #[serde(default)]
    pub rate: f64,
    #[serde(default)]
    pub amount: f64,
}

/// Customer attached to the cart, if any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

// =============================================================================
// Cart
// =============================================================================

/// The full cart as mirrored from the web POS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub discount: Discount,
    #[serde(default)]
    pub tax: Tax,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Grand total in baht.
    pub total: f64,
    /// Server-formatted timestamp of the last cart change.
    pub last_updated: String,
}

impl Cart {
    /// Converts all items to receipt lines, preserving order.
    pub fn receipt_lines(&self) -> CoreResult<Vec<ReceiptLine>> {
        self.items.iter().map(CartItem::to_receipt_line).collect()
    }

    /// Returns the grand total as Money.
    pub fn total_money(&self) -> CoreResult<Money> {
        Money::from_api_amount(self.total)
    }

    /// Checks if the cart has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// API Envelopes
// =============================================================================

/// Response envelope of the cart endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartResponse {
    pub success: bool,
    #[serde(default)]
    pub cart: Option<Cart>,
    #[serde(default)]
    pub error: Option<String>,
    pub timestamp: String,
}

impl CartResponse {
    /// Returns the cart when the request succeeded and carried one.
    pub fn into_cart(self) -> Option<Cart> {
        if self.success {
            self.cart
        } else {
            None
        }
    }
}

/// Payment state reported by the web POS for the customer display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    pub status: String,
    pub timestamp: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

/// Response envelope of the payment-status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusResponse {
    pub success: bool,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Domain Types
//!
//! Quantities and receipt lines shared by every printer backend.
//!
//! ## Type Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CartItem (API JSON, f64)                                               │
//! │       │  to_receipt_line()                                              │
//! │       ▼                                                                 │
//! │  ReceiptLine { name, quantity: Quantity, unit_price, line_total }       │
//! │       │                                                                 │
//! │       ├──► ReceiptEncoder (PeriPage raster)                             │
//! │       ├──► TextReceipt    (32-column Bluetooth/USB)                     │
//! │       └──► SmartPosPrinter (vendor SDK commands)                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Quantity
// =============================================================================

/// A fractional item quantity with three decimals (milli-units).
///
/// Weighed products are sold by the gram, so quantities such as `1.5` are
/// common. Storing thousandths keeps the arithmetic exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a quantity of whole units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * 1000)
    }

    /// Creates a quantity from thousandths of a unit.
    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    /// Converts a quantity received from the cart API.
    ///
    /// Rounds half away from zero to three decimals.
    pub fn from_api(qty: f64) -> CoreResult<Self> {
        let milli = (qty * 1000.0).round();
        if !milli.is_finite() || milli.abs() >= i64::MAX as f64 {
            return Err(CoreError::AmountOutOfRange(qty));
        }
        Ok(Quantity(milli as i64))
    }

    /// Returns the quantity in thousandths.
    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    /// Formats with a fixed number of decimals (0-3), rounding half away
    /// from zero like `String.format("%.Nf")`.
    ///
    /// ## Example
    /// ```rust
    /// use candykush_core::Quantity;
    ///
    /// let q = Quantity::from_milli(1_250);
    /// assert_eq!(q.to_fixed(1), "1.3");
    /// assert_eq!(q.to_fixed(2), "1.25");
    /// assert_eq!(Quantity::from_units(2).to_fixed(1), "2.0");
    /// ```
    pub fn to_fixed(&self, decimals: u32) -> String {
        let decimals = decimals.min(3);
        let divisor = 10_i64.pow(3 - decimals);
        let abs = self.0.abs();
        let scaled = (abs + divisor / 2) / divisor;
        let sign = if self.0 < 0 && scaled != 0 { "-" } else { "" };

        if decimals == 0 {
            return format!("{}{}", sign, scaled);
        }

        let unit = 10_i64.pow(decimals);
        format!(
            "{}{}.{:0width$}",
            sign,
            scaled / unit,
            scaled % unit,
            width = decimals as usize
        )
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fixed(3))
    }
}

// =============================================================================
// Receipt Line
// =============================================================================

/// One printed row of a receipt.
///
/// Immutable once constructed; built from cart contents at print time.
/// Order is preserved by every renderer and lines are never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    /// Product name as shown to the customer.
    pub name: String,
    /// Quantity sold (may be fractional for weighed goods).
    pub quantity: Quantity,
    /// Price of one unit.
    pub unit_price: Money,
    /// Total for the line as charged (after any line discount).
    pub line_total: Money,
}

impl ReceiptLine {
    /// Creates a line whose total is `unit_price × quantity`.
    pub fn new(name: impl Into<String>, quantity: Quantity, unit_price: Money) -> Self {
        ReceiptLine {
            name: name.into(),
            quantity,
            unit_price,
            line_total: unit_price.multiply_quantity(quantity),
        }
    }

    /// Creates a line with an explicit total (e.g. member price or discount
    /// already applied by the backend).
    pub fn with_total(
        name: impl Into<String>,
        quantity: Quantity,
        unit_price: Money,
        line_total: Money,
    ) -> Self {
        ReceiptLine {
            name: name.into(),
            quantity,
            unit_price,
            line_total,
        }
    }

    /// Returns the name fitted into `budget` characters.
    ///
    /// Names longer than the budget keep their first `budget - 3`
    /// characters followed by `...`. Counts characters, not bytes, so Thai
    /// product names are cut on character boundaries.
    ///
    /// ## Example
    /// ```rust
    /// use candykush_core::{Money, Quantity, ReceiptLine};
    ///
    /// let line = ReceiptLine::new("Sour Watermelon Slices", Quantity::from_units(1), Money::zero());
    /// assert_eq!(line.display_name(15), "Sour Waterme...");
    /// assert_eq!(line.display_name(30), "Sour Watermelon Slices");
    /// ```
    pub fn display_name(&self, budget: usize) -> String {
        truncate_with_ellipsis(&self.name, budget)
    }
}

/// Truncates `text` to `budget` characters, marking the cut with `...`.
pub fn truncate_with_ellipsis(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let keep = budget.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Sums the line totals of a receipt.
pub fn lines_total(lines: &[ReceiptLine]) -> Money {
    lines.iter().map(|l| l.line_total).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================

//! Rows of the sale history and the orphan audit.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Essence, Sale, money};

/// Whether the product of a sale still exists in the inventory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Available,
    Unavailable,
}

impl ProductStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
        }
    }
}

/// One sale with its product resolved against the current inventory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleHistoryRow {
    pub sale: Sale,
    pub product_name: String,
    pub status: ProductStatus,
    pub container_name: Option<String>,
    /// Profit re-estimated from the product's current cost basis.
    /// `None` when the product is gone.
    pub recomputed_profit: Option<Decimal>,
}

/// A product id that is referenced by sales but missing from the inventory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanedProduct {
    pub product_id: String,
    pub sale_count: i64,
}

/// Best-effort display name for a sale whose product was deleted: the name
/// stored with the sale, then the known names table, then a placeholder
/// derived from the id.
pub(crate) fn recovered_name(sale: &Sale, known: &HashMap<String, String>) -> String {
    if let Some(name) = &sale.product_name {
        return name.clone();
    }
    if let Some(name) = known.get(&sale.product_id) {
        return name.clone();
    }
    if sale.product_id.starts_with("ESE") {
        format!("Esencia {}", sale.product_id)
    } else {
        format!("Producto {}", sale.product_id)
    }
}

/// What an essence's sales have taken out of its batch so far.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SoldSoFar {
    pub quantity_ml: Decimal,
    pub essence_cost: Decimal,
}

/// Re-estimates a sale's profit from the essence as it is now: the current
/// entry cost plus what earlier sales already charged, spread over the
/// current stock plus every ml sold.
pub(crate) fn recomputed_profit(essence: &Essence, sold: SoldSoFar, sale: &Sale) -> Decimal {
    let per_ml = money::cost_per_unit(
        essence.entry_cost + sold.essence_cost,
        essence.stock_ml + sold.quantity_ml,
    );
    let total_cost = per_ml * sale.quantity_ml + sale.costs.container_cost + sale.costs.overhead_cost;
    money::profit(sale.sale_price, total_cost)
}

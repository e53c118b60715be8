//! Read-only summaries over the inventory and the sale ledger.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Gender, Sale};

/// Aggregates over a set of sales. Empty sets produce zeros.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesStatistics {
    pub total_sales: u64,
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
    pub average_sale: Decimal,
    pub average_profit: Decimal,
    pub distinct_products: u64,
}

impl SalesStatistics {
    pub fn from_sales<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> Self {
        let mut stats = Self::default();
        let mut products = HashSet::new();
        for sale in sales {
            stats.total_sales += 1;
            stats.total_revenue += sale.sale_price;
            stats.total_profit += sale.profit;
            products.insert(sale.product_id.as_str());
        }
        stats.distinct_products = products.len() as u64;
        if stats.total_sales > 0 {
            let count = Decimal::from(stats.total_sales);
            stats.average_sale = stats.total_revenue / count;
            stats.average_profit = stats.total_profit / count;
        }
        stats
    }
}

/// Stock summary of one product kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindValuation {
    pub items: u64,
    pub low_stock: u64,
    pub stock_value: Decimal,
}

impl KindValuation {
    pub(crate) fn add(&mut self, stock_value: Decimal, is_low_stock: bool) {
        self.items += 1;
        if is_low_stock {
            self.low_stock += 1;
        }
        self.stock_value += stock_value;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryValuation {
    pub essences: KindValuation,
    pub containers: KindValuation,
    pub total_value: Decimal,
}

/// Inventory and sales figures of one gender tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderStatistics {
    pub gender: Gender,
    pub essences: u64,
    pub stock_ml: Decimal,
    pub stock_value: Decimal,
    pub sales: SalesStatistics,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::SaleCosts;

    fn sale(id: &str, product_id: &str, price: Decimal, profit: Decimal) -> Sale {
        Sale {
            id: id.to_string(),
            product_id: product_id.to_string(),
            container_id: None,
            quantity_ml: dec!(10),
            sale_price: price,
            sold_at: Utc::now(),
            customer: None,
            profit,
            costs: SaleCosts::default(),
            product_name: None,
            gender: None,
        }
    }

    #[test]
    fn empty_ledger_gives_zeros() {
        let stats = SalesStatistics::from_sales(&Vec::<Sale>::new());
        assert_eq!(stats, SalesStatistics::default());
        assert_eq!(stats.average_sale, Decimal::ZERO);
    }

    #[test]
    fn folds_totals_and_averages() {
        let sales = [
            sale("SAL001", "ESE001", dec!(100), dec!(50)),
            sale("SAL002", "ESE001", dec!(60), dec!(-5)),
            sale("SAL003", "ESE002", dec!(20), dec!(10)),
        ];
        let stats = SalesStatistics::from_sales(&sales);
        assert_eq!(stats.total_sales, 3);
        assert_eq!(stats.total_revenue, dec!(180));
        assert_eq!(stats.total_profit, dec!(55));
        assert_eq!(stats.average_sale, dec!(60));
        assert_eq!(stats.distinct_products, 2);
    }
}

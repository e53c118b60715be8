//! Plain text rendering of engine results.

use std::fmt::Write;

use engine::{
    Container, Essence, GenderStatistics, InventoryValuation, KindValuation, OrphanedProduct,
    Product, Sale, SaleHistoryRow, SalesStatistics,
};
use rust_decimal::Decimal;

fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

fn quantity(value: Decimal) -> String {
    value.round_dp(3).normalize().to_string()
}

fn low_flag(low: bool) -> &'static str {
    if low { "  LOW" } else { "" }
}

pub fn essence(essence: &Essence) -> String {
    format!(
        "{id}  {name} ({gender})\n  stock {stock} ml, entry cost {entry}, {per_ml}/ml, value {value}{low}\n  supplier {supplier}, expires {expiry}",
        id = essence.id,
        name = essence.name,
        gender = essence.gender,
        stock = quantity(essence.stock_ml),
        entry = money(essence.entry_cost),
        per_ml = money(essence.cost_per_ml),
        value = money(essence.stock_value()),
        low = low_flag(essence.is_low_stock()),
        supplier = if essence.supplier.is_empty() { "-" } else { essence.supplier.as_str() },
        expiry = essence.expiry_date,
    )
}

pub fn container(container: &Container) -> String {
    format!(
        "{id}  {name}\n  {units} units of {capacity} ml at {cost}, value {value}{low}",
        id = container.id,
        name = container.name,
        units = container.stock_units,
        capacity = quantity(container.capacity_ml),
        cost = money(container.unit_cost),
        value = money(container.stock_value()),
        low = low_flag(container.is_low_stock()),
    )
}

pub fn essences(essences: &[Essence]) -> String {
    if essences.is_empty() {
        return "no essences".to_string();
    }
    essences.iter().map(essence).collect::<Vec<_>>().join("\n")
}

pub fn containers(containers: &[Container]) -> String {
    if containers.is_empty() {
        return "no containers".to_string();
    }
    containers.iter().map(container).collect::<Vec<_>>().join("\n")
}

pub fn products(products: &[Product]) -> String {
    if products.is_empty() {
        return "no products".to_string();
    }
    products
        .iter()
        .map(|product| {
            format!(
                "{:<10} {:<9} {:<28} {:>10}{}",
                product.id(),
                product.kind().as_str(),
                product.name(),
                money(product.stock_value()),
                low_flag(product.is_low_stock()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn sale(sale: &Sale) -> String {
    let mut out = format!(
        "{id}  {date}  {product} {quantity} ml for {price}, profit {profit}",
        id = sale.id,
        date = sale.sold_at.format("%Y-%m-%d %H:%M"),
        product = sale.product_id,
        quantity = quantity(sale.quantity_ml),
        price = money(sale.sale_price),
        profit = money(sale.profit),
    );
    let _ = write!(
        out,
        "\n  costs: essence {} + container {} + overhead {}",
        money(sale.costs.essence_cost),
        money(sale.costs.container_cost),
        money(sale.costs.overhead_cost),
    );
    if let Some(container) = &sale.container_id {
        let _ = write!(out, "\n  container {container}");
    }
    if let Some(customer) = &sale.customer {
        let _ = write!(out, "\n  customer {customer}");
    }
    out
}

pub fn sales(sales: &[Sale]) -> String {
    if sales.is_empty() {
        return "no sales".to_string();
    }
    sales.iter().map(sale).collect::<Vec<_>>().join("\n")
}

pub fn history(rows: &[SaleHistoryRow]) -> String {
    if rows.is_empty() {
        return "no sales".to_string();
    }
    rows.iter()
        .map(|row| {
            let mut line = format!(
                "{id}  {date}  {name} [{status}]  {quantity} ml for {price}, profit {profit}",
                id = row.sale.id,
                date = row.sale.sold_at.format("%Y-%m-%d %H:%M"),
                name = row.product_name,
                status = row.status.as_str(),
                quantity = quantity(row.sale.quantity_ml),
                price = money(row.sale.sale_price),
                profit = money(row.sale.profit),
            );
            if let Some(estimate) = row.recomputed_profit {
                let _ = write!(line, " (now {})", money(estimate));
            }
            if let Some(container) = &row.container_name {
                let _ = write!(line, ", in {container}");
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn orphans(orphans: &[OrphanedProduct]) -> String {
    if orphans.is_empty() {
        return "every sale references an existing essence".to_string();
    }
    orphans
        .iter()
        .map(|orphan| format!("{:<10} {} sales", orphan.product_id, orphan.sale_count))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn statistics(stats: &SalesStatistics) -> String {
    format!(
        "sales {}, revenue {}, profit {}\naverage sale {}, average profit {}, products sold {}",
        stats.total_sales,
        money(stats.total_revenue),
        money(stats.total_profit),
        money(stats.average_sale),
        money(stats.average_profit),
        stats.distinct_products,
    )
}

fn kind_valuation(label: &str, kind: &KindValuation) -> String {
    format!(
        "{label:<11} {items} items ({low} low), value {value}",
        items = kind.items,
        low = kind.low_stock,
        value = money(kind.stock_value),
    )
}

pub fn valuation(valuation: &InventoryValuation) -> String {
    format!(
        "{}\n{}\ntotal       {}",
        kind_valuation("essences", &valuation.essences),
        kind_valuation("containers", &valuation.containers),
        money(valuation.total_value),
    )
}

pub fn gender_statistics(rows: &[GenderStatistics]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{gender}: {essences} essences, {stock} ml, value {value}\n  {sales}",
                gender = row.gender,
                essences = row.essences,
                stock = quantity(row.stock_ml),
                value = money(row.stock_value),
                sales = statistics(&row.sales).replace('\n', "\n  "),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_are_shown_with_two_decimals() {
        assert_eq!(money(Decimal::new(125, 0)), "125.00");
        assert_eq!(money(Decimal::new(-2505, 3)), "-2.50");
        assert_eq!(quantity(Decimal::new(3000, 1)), "300");
    }
}

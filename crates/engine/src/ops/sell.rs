use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, ResultEngine, Sale, SaleCosts, containers, essences,
    util::{ensure_non_negative, ensure_positive, normalize_optional, normalize_required},
};

use super::{Engine, with_tx};

/// Input of [`Engine::sell_essence`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRequest {
    pub product_id: String,
    pub quantity_ml: Decimal,
    /// Total charged to the customer.
    pub sale_price: Decimal,
    pub customer: Option<String>,
    pub container_id: Option<String>,
    /// `None` applies the engine's default overhead.
    pub overhead_cost: Option<Decimal>,
    /// `None` means now.
    pub sold_at: Option<DateTime<Utc>>,
}

impl SaleRequest {
    pub fn new(product_id: impl Into<String>, quantity_ml: Decimal, sale_price: Decimal) -> Self {
        Self {
            product_id: product_id.into(),
            quantity_ml,
            sale_price,
            customer: None,
            container_id: None,
            overhead_cost: None,
            sold_at: None,
        }
    }

    pub fn customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }

    pub fn container(mut self, container_id: impl Into<String>) -> Self {
        self.container_id = Some(container_id.into());
        self
    }

    pub fn overhead_cost(mut self, amount: Decimal) -> Self {
        self.overhead_cost = Some(amount);
        self
    }

    pub fn sold_at(mut self, at: DateTime<Utc>) -> Self {
        self.sold_at = Some(at);
        self
    }
}

impl Engine {
    /// Sells `quantity_ml` of an essence, optionally bottled in a container.
    ///
    /// The essence cost is the share of the batch's `entry_cost` carried by
    /// the sold quantity out of the stock present right before the sale.
    /// Stock and entry cost are debited, the container loses one unit, and
    /// the sale is appended to the ledger with its profit frozen. All of it
    /// happens in one DB transaction: any error leaves the inventory and the
    /// ledger as they were.
    ///
    /// Errors:
    /// - [`EngineError::InvalidInput`] for a non positive quantity or a
    ///   negative price or overhead.
    /// - [`EngineError::EssenceNotFound`] / [`EngineError::ContainerNotFound`].
    /// - [`EngineError::InsufficientStock`] when the essence holds less than
    ///   requested or the container has no units left.
    /// - [`EngineError::CapacityExceeded`] when the quantity does not fit in
    ///   the container.
    pub async fn sell_essence(&self, request: SaleRequest) -> ResultEngine<Sale> {
        let product_id = normalize_required(&request.product_id, "product id")?;
        let container_id = normalize_optional(request.container_id.as_deref());
        let customer = normalize_optional(request.customer.as_deref());
        let quantity = request.quantity_ml;
        ensure_positive(quantity, "quantity_ml")?;
        ensure_non_negative(request.sale_price, "sale_price")?;
        let overhead = request.overhead_cost.unwrap_or(self.default_overhead);
        ensure_non_negative(overhead, "overhead_cost")?;
        let sold_at = request.sold_at.unwrap_or_else(Utc::now);

        with_tx!(self, |db_tx| {
            let mut essence = self.require_essence(&db_tx, &product_id).await?;
            let mut container = match &container_id {
                Some(id) => Some(self.require_container(&db_tx, id).await?),
                None => None,
            };

            if quantity > essence.stock_ml {
                return Err(EngineError::InsufficientStock {
                    item: essence.id,
                    available: essence.stock_ml,
                    requested: quantity,
                });
            }
            if let Some(container) = &container {
                if container.stock_units < 1 {
                    return Err(EngineError::InsufficientStock {
                        item: container.id.clone(),
                        available: Decimal::from(container.stock_units),
                        requested: Decimal::ONE,
                    });
                }
                if quantity > container.capacity_ml {
                    return Err(EngineError::CapacityExceeded {
                        container: container.id.clone(),
                        capacity: container.capacity_ml,
                        requested: quantity,
                    });
                }
            }

            let container_cost = container
                .as_ref()
                .map_or(Decimal::ZERO, |container| container.unit_cost);
            let costs = SaleCosts::compute(
                essence.entry_cost,
                essence.stock_ml,
                quantity,
                container_cost,
                overhead,
            );
            let profit = costs.profit(request.sale_price);

            essence.stock_ml -= quantity;
            essence.entry_cost = (essence.entry_cost - costs.essence_cost).max(Decimal::ZERO);
            let essence_model: essences::ActiveModel = (&essence).into();
            essence_model.update(&db_tx).await?;

            if let Some(container) = container.as_mut() {
                container.stock_units -= 1;
                let container_model: containers::ActiveModel = (&*container).into();
                container_model.update(&db_tx).await?;
            }

            let sale = Sale {
                id: self.next_sale_id_in(&db_tx).await,
                product_id: essence.id.clone(),
                container_id: container.map(|container| container.id),
                quantity_ml: quantity,
                sale_price: request.sale_price,
                sold_at,
                customer,
                profit,
                costs,
                product_name: Some(essence.name.clone()),
                gender: Some(essence.gender),
            };
            self.append_sale_in(&db_tx, &sale).await?;

            tracing::info!(
                id = %sale.id,
                product = %sale.product_id,
                quantity = %sale.quantity_ml,
                price = %sale.sale_price,
                profit = %sale.profit,
                "sale recorded"
            );
            Ok(sale)
        })
    }
}

//! Sale ("salida") primitives.
//!
//! A `Sale` is immutable ledger data. It references products by copied id
//! strings only: the `sales` table has no foreign keys, so removing an
//! essence or a container never touches its history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, Gender,
    money::SaleCosts,
    util::{from_storage, to_storage},
};

/// Prefix of sequential sale ids (`SAL001`, `SAL002`, ...).
pub const SALE_ID_PREFIX: &str = "SAL";

const SALE_ID_DIGITS: usize = 3;

/// Sequence number of an id following the `SAL` + digits scheme.
pub(crate) fn sale_sequence(id: &str) -> Option<u64> {
    let digits = id.strip_prefix(SALE_ID_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

pub(crate) fn format_sale_id(sequence: u64) -> String {
    format!("{SALE_ID_PREFIX}{sequence:0width$}", width = SALE_ID_DIGITS)
}

/// Next sequential id after the highest sequence among `ids`, ignoring ids
/// outside the scheme. `None` if the sequence cannot advance.
pub(crate) fn next_sequential_id<'a>(ids: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let highest = ids.into_iter().filter_map(sale_sequence).max().unwrap_or(0);
    highest.checked_add(1).map(format_sale_id)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    pub product_id: String,
    pub container_id: Option<String>,
    pub quantity_ml: Decimal,
    /// Total charged to the customer, not a unit price.
    pub sale_price: Decimal,
    pub sold_at: DateTime<Utc>,
    pub customer: Option<String>,
    /// Computed once, from the cost basis at sale time.
    pub profit: Decimal,
    pub costs: SaleCosts,
    /// Product name when the sale happened, if known.
    pub product_name: Option<String>,
    /// Gender tag of the essence when the sale happened, if known.
    pub gender: Option<Gender>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub product_id: String,
    pub container_id: Option<String>,
    pub quantity_vendida: f64,
    pub precio_venta: f64,
    pub fecha_venta: DateTimeUtc,
    pub cliente: Option<String>,
    pub ganancia: f64,
    pub essence_cost: f64,
    pub container_cost: f64,
    pub overhead_cost: f64,
    pub product_name: Option<String>,
    pub gender: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Sale> for ActiveModel {
    fn from(sale: &Sale) -> Self {
        Self {
            id: ActiveValue::Set(sale.id.clone()),
            product_id: ActiveValue::Set(sale.product_id.clone()),
            container_id: ActiveValue::Set(sale.container_id.clone()),
            quantity_vendida: ActiveValue::Set(to_storage(sale.quantity_ml)),
            precio_venta: ActiveValue::Set(to_storage(sale.sale_price)),
            fecha_venta: ActiveValue::Set(sale.sold_at),
            cliente: ActiveValue::Set(sale.customer.clone()),
            ganancia: ActiveValue::Set(to_storage(sale.profit)),
            essence_cost: ActiveValue::Set(to_storage(sale.costs.essence_cost)),
            container_cost: ActiveValue::Set(to_storage(sale.costs.container_cost)),
            overhead_cost: ActiveValue::Set(to_storage(sale.costs.overhead_cost)),
            product_name: ActiveValue::Set(sale.product_name.clone()),
            gender: ActiveValue::Set(sale.gender.map(|g| g.as_str().to_string())),
        }
    }
}

impl TryFrom<Model> for Sale {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let quantity_ml = from_storage(model.quantity_vendida, "quantity_vendida")?;
        let essence_cost = from_storage(model.essence_cost, "essence_cost")?;
        let costs = SaleCosts {
            cost_per_ml: if quantity_ml.is_zero() {
                Decimal::ZERO
            } else {
                essence_cost / quantity_ml
            },
            essence_cost,
            container_cost: from_storage(model.container_cost, "container_cost")?,
            overhead_cost: from_storage(model.overhead_cost, "overhead_cost")?,
        };
        // An unreadable snapshot only loses a label, never the sale.
        let gender = model
            .gender
            .as_deref()
            .and_then(|g| Gender::try_from(g).ok());
        Ok(Self {
            quantity_ml,
            sale_price: from_storage(model.precio_venta, "precio_venta")?,
            profit: from_storage(model.ganancia, "ganancia")?,
            costs,
            gender,
            id: model.id,
            product_id: model.product_id,
            container_id: model.container_id,
            sold_at: model.fecha_venta,
            customer: model.cliente,
            product_name: model.product_name,
        })
    }
}

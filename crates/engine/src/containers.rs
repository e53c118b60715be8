//! The module contains the `Container` struct (a bottle, "frasco") and its
//! storage model.

use rust_decimal::Decimal;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, ResultEngine, money,
    util::{ensure_non_negative, ensure_positive, from_storage, normalize_required, to_storage},
};

/// Below this many units a container is reported as low on stock.
pub const LOW_STOCK_UNITS: i64 = 10;

/// Mutable fields of a container, used by both add and update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerFields {
    pub name: String,
    pub unit_cost: Decimal,
    pub capacity_ml: Decimal,
    pub stock_units: i64,
}

/// A bottle sold as a discrete unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub id: String,
    pub name: String,
    pub unit_cost: Decimal,
    pub capacity_ml: Decimal,
    pub stock_units: i64,
}

impl Container {
    pub fn new(id: &str, fields: ContainerFields) -> ResultEngine<Self> {
        let id = normalize_required(id, "container id")?;
        let mut container = Self {
            id,
            name: String::new(),
            unit_cost: Decimal::ZERO,
            capacity_ml: Decimal::ZERO,
            stock_units: 0,
        };
        container.apply(fields)?;
        Ok(container)
    }

    /// Replaces every mutable field. On error the container is left untouched.
    pub fn apply(&mut self, fields: ContainerFields) -> ResultEngine<()> {
        let name = normalize_required(&fields.name, "container name")?;
        ensure_non_negative(fields.unit_cost, "unit_cost")?;
        ensure_positive(fields.capacity_ml, "capacity_ml")?;
        if fields.stock_units < 0 {
            return Err(EngineError::InvalidInput(format!(
                "stock_units must be >= 0, got {}",
                fields.stock_units
            )));
        }

        self.name = name;
        self.unit_cost = fields.unit_cost;
        self.capacity_ml = fields.capacity_ml;
        self.stock_units = fields.stock_units;
        Ok(())
    }

    pub fn stock_value(&self) -> Decimal {
        money::stock_value(Decimal::from(self.stock_units), self.unit_cost)
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock_units < LOW_STOCK_UNITS
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "containers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub cost: f64,
    pub capacity_ml: f64,
    pub stock_actual: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Container> for ActiveModel {
    fn from(value: &Container) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            cost: ActiveValue::Set(to_storage(value.unit_cost)),
            capacity_ml: ActiveValue::Set(to_storage(value.capacity_ml)),
            stock_actual: ActiveValue::Set(value.stock_units),
        }
    }
}

impl TryFrom<Model> for Container {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            unit_cost: from_storage(model.cost, "container cost")?,
            capacity_ml: from_storage(model.capacity_ml, "capacity_ml")?,
            stock_units: model.stock_actual,
            id: model.id,
            name: model.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn fields() -> ContainerFields {
        ContainerFields {
            name: "Frasco 30ml".to_string(),
            unit_cost: dec!(5.00),
            capacity_ml: dec!(30),
            stock_units: 5,
        }
    }

    #[test]
    fn derived_values() {
        let container = Container::new("F001", fields()).unwrap();
        assert_eq!(container.stock_value(), dec!(25));
        assert!(container.is_low_stock());

        let mut stocked = fields();
        stocked.stock_units = 10;
        assert!(!Container::new("F002", stocked).unwrap().is_low_stock());
    }

    #[test]
    fn capacity_must_be_positive() {
        let mut empty = fields();
        empty.capacity_ml = Decimal::ZERO;
        assert!(matches!(
            Container::new("F001", empty),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn negative_units_are_rejected() {
        let mut negative = fields();
        negative.stock_units = -1;
        assert!(Container::new("F001", negative).is_err());
    }
}

//! The module contains the `Essence` struct and its storage model.
//!
//! An essence is a bulk aromatic liquid tracked in milliliters. Its
//! `entry_cost` is the cost of the batch currently on hand; `cost_per_ml` is
//! recorded separately at creation and is informational only.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, ResultEngine, money,
    util::{ensure_non_negative, from_storage, normalize_required, to_storage},
};

/// Below this many ml an essence is reported as low on stock.
pub const LOW_STOCK_ML: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Date format used for expiry dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Gender tag of an essence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Masculine,
    Feminine,
    #[default]
    Unisex,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Masculine, Gender::Feminine, Gender::Unisex];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Masculine => "masculine",
            Self::Feminine => "feminine",
            Self::Unisex => "unisex",
        }
    }
}

impl core::fmt::Display for Gender {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::Masculine => "Masculine",
            Self::Feminine => "Feminine",
            Self::Unisex => "Unisex",
        };
        f.write_str(label)
    }
}

impl TryFrom<&str> for Gender {
    type Error = EngineError;

    /// Accepts the stored names and the Spanish labels of older data,
    /// ignoring case.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "masculine" | "masculino" => Ok(Self::Masculine),
            "feminine" | "femenino" => Ok(Self::Feminine),
            "unisex" => Ok(Self::Unisex),
            other => Err(EngineError::InvalidInput(format!(
                "invalid gender '{other}': expected one of masculine, feminine, unisex"
            ))),
        }
    }
}

/// Parses a `YYYY-MM-DD` expiry date.
pub fn parse_expiry_date(value: &str) -> ResultEngine<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        EngineError::InvalidInput(format!(
            "invalid expiry date '{}': expected a calendar date as YYYY-MM-DD",
            value.trim()
        ))
    })
}

/// Mutable fields of an essence, used by both add and update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssenceFields {
    pub name: String,
    #[serde(default)]
    pub gender: Gender,
    pub stock_ml: Decimal,
    pub entry_cost: Decimal,
    pub cost_per_ml: Decimal,
    pub supplier: String,
    pub expiry_date: NaiveDate,
}

/// A bulk essence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Essence {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub stock_ml: Decimal,
    pub entry_cost: Decimal,
    pub cost_per_ml: Decimal,
    pub supplier: String,
    pub expiry_date: NaiveDate,
}

impl Essence {
    /// Builds a validated essence.
    pub fn new(id: &str, fields: EssenceFields) -> ResultEngine<Self> {
        let id = normalize_required(id, "essence id")?;
        let mut essence = Self {
            id,
            name: String::new(),
            gender: Gender::default(),
            stock_ml: Decimal::ZERO,
            entry_cost: Decimal::ZERO,
            cost_per_ml: Decimal::ZERO,
            supplier: String::new(),
            expiry_date: fields.expiry_date,
        };
        essence.apply(fields)?;
        Ok(essence)
    }

    /// Replaces every mutable field. The id never changes. On error the
    /// essence is left untouched.
    pub fn apply(&mut self, fields: EssenceFields) -> ResultEngine<()> {
        let name = normalize_required(&fields.name, "essence name")?;
        ensure_non_negative(fields.stock_ml, "stock_ml")?;
        ensure_non_negative(fields.entry_cost, "entry_cost")?;
        ensure_non_negative(fields.cost_per_ml, "cost_per_ml")?;

        self.name = name;
        self.gender = fields.gender;
        self.stock_ml = fields.stock_ml;
        self.entry_cost = fields.entry_cost;
        self.cost_per_ml = fields.cost_per_ml;
        self.supplier = fields.supplier.trim().to_string();
        self.expiry_date = fields.expiry_date;
        Ok(())
    }

    pub fn stock_value(&self) -> Decimal {
        money::stock_value(self.stock_ml, self.cost_per_ml)
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock_ml < LOW_STOCK_ML
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "essences")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub gender: String,
    pub stock_ml: f64,
    pub entry_cost: f64,
    pub supplier: String,
    pub expiry_date: Date,
    pub cost_per_ml: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Essence> for ActiveModel {
    fn from(value: &Essence) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            gender: ActiveValue::Set(value.gender.as_str().to_string()),
            stock_ml: ActiveValue::Set(to_storage(value.stock_ml)),
            entry_cost: ActiveValue::Set(to_storage(value.entry_cost)),
            supplier: ActiveValue::Set(value.supplier.clone()),
            expiry_date: ActiveValue::Set(value.expiry_date),
            cost_per_ml: ActiveValue::Set(to_storage(value.cost_per_ml)),
        }
    }
}

impl TryFrom<Model> for Essence {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let gender = Gender::try_from(model.gender.as_str()).map_err(|_| {
            EngineError::Corrupted(format!(
                "essence {} has unknown gender '{}'",
                model.id, model.gender
            ))
        })?;
        Ok(Self {
            stock_ml: from_storage(model.stock_ml, "stock_ml")?,
            entry_cost: from_storage(model.entry_cost, "entry_cost")?,
            cost_per_ml: from_storage(model.cost_per_ml, "cost_per_ml")?,
            id: model.id,
            name: model.name,
            gender,
            supplier: model.supplier,
            expiry_date: model.expiry_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn fields() -> EssenceFields {
        EssenceFields {
            name: "Lavanda Premium".to_string(),
            gender: Gender::Unisex,
            stock_ml: dec!(500),
            entry_cost: dec!(125.00),
            cost_per_ml: dec!(0.25),
            supplier: "Aromática Natural".to_string(),
            expiry_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        }
    }

    #[test]
    fn derived_values() {
        let essence = Essence::new("ESE001", fields()).unwrap();
        assert_eq!(essence.stock_value(), dec!(125));
        assert!(!essence.is_low_stock());

        let mut low = fields();
        low.stock_ml = dec!(49.9);
        assert!(Essence::new("ESE002", low).unwrap().is_low_stock());

        let mut edge = fields();
        edge.stock_ml = dec!(50);
        assert!(!Essence::new("ESE003", edge).unwrap().is_low_stock());
    }

    #[test]
    fn rejects_negative_numbers_and_empty_names() {
        let mut negative = fields();
        negative.entry_cost = dec!(-1);
        assert!(matches!(
            Essence::new("ESE001", negative),
            Err(EngineError::InvalidInput(_))
        ));

        let mut unnamed = fields();
        unnamed.name = "   ".to_string();
        assert!(Essence::new("ESE001", unnamed).is_err());
        assert!(Essence::new("  ", fields()).is_err());
    }

    #[test]
    fn failed_apply_leaves_essence_untouched() {
        let mut essence = Essence::new("ESE001", fields()).unwrap();
        let before = essence.clone();
        let mut bad = fields();
        bad.name = "Otra".to_string();
        bad.stock_ml = dec!(-5);
        assert!(essence.apply(bad).is_err());
        assert_eq!(essence, before);
    }

    #[test]
    fn gender_parsing() {
        assert_eq!(Gender::try_from("Femenino").unwrap(), Gender::Feminine);
        assert_eq!(Gender::try_from("MASCULINE").unwrap(), Gender::Masculine);
        assert_eq!(Gender::default(), Gender::Unisex);
        assert!(Gender::try_from("other").is_err());
    }

    #[test]
    fn expiry_date_must_be_a_calendar_date() {
        assert_eq!(
            parse_expiry_date("2025-06-15").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
        );
        assert!(parse_expiry_date("2025-02-30").is_err());
        assert!(parse_expiry_date("15/06/2025").is_err());
    }
}

#![allow(dead_code)]

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{Database, DatabaseConnection};

use engine::{ContainerFields, Engine, EssenceFields, Gender};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub async fn engine_with_options(
    known_names: HashMap<String, String>,
    default_overhead: Decimal,
) -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder()
        .database(db)
        .known_product_names(known_names)
        .default_overhead_cost(default_overhead)
        .build()
        .await
        .unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 500 ml bought for 125.00.
pub fn lavanda() -> EssenceFields {
    EssenceFields {
        name: "Lavanda Premium".to_string(),
        gender: Gender::Unisex,
        stock_ml: dec!(500),
        entry_cost: dec!(125.00),
        cost_per_ml: dec!(0.25),
        supplier: "Aromática Natural".to_string(),
        expiry_date: date(2025, 12, 31),
    }
}

pub fn essence(name: &str, gender: Gender, stock_ml: Decimal, entry_cost: Decimal) -> EssenceFields {
    EssenceFields {
        name: name.to_string(),
        gender,
        stock_ml,
        entry_cost,
        cost_per_ml: if stock_ml.is_zero() {
            Decimal::ZERO
        } else {
            entry_cost / stock_ml
        },
        supplier: "Proveedor".to_string(),
        expiry_date: date(2026, 6, 30),
    }
}

/// 30 ml bottle, 5 units at 5.00.
pub fn frasco() -> ContainerFields {
    ContainerFields {
        name: "Frasco 30ml".to_string(),
        unit_cost: dec!(5.00),
        capacity_ml: dec!(30),
        stock_units: 5,
    }
}

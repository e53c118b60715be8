use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{TransactionTrait, prelude::*};

use crate::{EngineError, Essence, EssenceFields, Gender, Product, ResultEngine, essences};

use super::{Engine, with_tx};

/// id, name, stock ml, entry cost (cents), cost per ml (cents), supplier, expiry.
const SAMPLE_ESSENCES: [(&str, &str, i64, i64, i64, &str, (i32, u32, u32)); 5] = [
    ("ESE001", "Lavanda Premium", 500, 12500, 25, "Aromática Natural", (2025, 12, 31)),
    ("ESE002", "Rosa Búlgara", 50, 4000, 80, "Esencias del Mundo", (2025, 6, 15)),
    ("ESE003", "Eucalipto", 300, 4500, 15, "Aromática Natural", (2026, 3, 20)),
    ("ESE004", "Ylang Ylang", 80, 7600, 95, "Tropical Scents", (2025, 9, 10)),
    ("ESE101", "Es Davo", 250, 250000, 1000, "Luisito", (2025, 9, 21)),
];

fn sample_essences() -> ResultEngine<Vec<Essence>> {
    SAMPLE_ESSENCES
        .iter()
        .map(|&(id, name, stock, entry_cents, per_ml_cents, supplier, (y, m, d))| {
            let expiry_date = NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| {
                EngineError::InvalidInput(format!("invalid sample date for {id}"))
            })?;
            Essence::new(
                id,
                EssenceFields {
                    name: name.to_string(),
                    gender: Gender::Unisex,
                    stock_ml: Decimal::from(stock),
                    entry_cost: Decimal::new(entry_cents, 2),
                    cost_per_ml: Decimal::new(per_ml_cents, 2),
                    supplier: supplier.to_string(),
                    expiry_date,
                },
            )
        })
        .collect()
}

impl Engine {
    /// Every essence and container as a tagged [`Product`], sorted by id.
    pub async fn list_products(&self) -> ResultEngine<Vec<Product>> {
        let mut products: Vec<Product> = self
            .list_essences()
            .await?
            .into_iter()
            .map(Product::from)
            .collect();
        products.extend(self.list_containers().await?.into_iter().map(Product::from));
        products.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(products)
    }

    /// Inserts the sample catalogue, skipping ids that already exist.
    /// Returns how many essences were inserted.
    pub async fn seed_sample_essences(&self) -> ResultEngine<usize> {
        let samples = sample_essences()?;
        with_tx!(self, |db_tx| {
            let mut inserted = 0;
            for essence in &samples {
                let exists = essences::Entity::find_by_id(essence.id.clone())
                    .one(&db_tx)
                    .await?
                    .is_some();
                if exists {
                    continue;
                }
                let model: essences::ActiveModel = essence.into();
                model.insert(&db_tx).await?;
                inserted += 1;
            }
            tracing::info!(inserted, "sample essences seeded");
            Ok(inserted)
        })
    }
}

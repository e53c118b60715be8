//! Append-only sale ledger: id generation, insertion, lookups and the
//! history views built on top of the current inventory.
//!
//! No operation here updates or deletes a sale.

use std::collections::HashMap;

use sea_orm::{
    ConnectionTrait, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, Statement,
    TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Container, EngineError, Essence, OrphanedProduct, ProductStatus, ResultEngine, Sale,
    SaleHistoryRow, containers, essences,
    history::{SoldSoFar, recomputed_profit, recovered_name},
    sales::{self, SALE_ID_PREFIX, next_sequential_id},
};

use super::{Engine, with_tx};

fn fallback_sale_id() -> String {
    format!("{SALE_ID_PREFIX}-{}", Uuid::now_v7().simple())
}

impl Engine {
    /// Id the next appended sale will get: `SAL` followed by one more than
    /// the highest sequence in the ledger, zero padded to three digits.
    pub async fn next_sale_id(&self) -> ResultEngine<String> {
        with_tx!(self, |db_tx| Ok(self.next_sale_id_in(&db_tx).await))
    }

    /// Never fails: if the ledger cannot be read or the sequence is
    /// exhausted, a time-ordered unique id is returned instead.
    pub(super) async fn next_sale_id_in(&self, db_tx: &DatabaseTransaction) -> String {
        let ids = sales::Entity::find()
            .select_only()
            .column(sales::Column::Id)
            .into_tuple::<String>()
            .all(db_tx)
            .await;
        match ids {
            Ok(ids) => match next_sequential_id(ids.iter().map(String::as_str)) {
                Some(id) => id,
                None => {
                    let id = fallback_sale_id();
                    tracing::warn!(%id, "sale sequence exhausted, using time based id");
                    id
                }
            },
            Err(err) => {
                let id = fallback_sale_id();
                tracing::warn!(%id, error = %err, "cannot read sale ids, using time based id");
                id
            }
        }
    }

    pub(super) async fn append_sale_in(
        &self,
        db_tx: &DatabaseTransaction,
        sale: &Sale,
    ) -> ResultEngine<()> {
        let exists = sales::Entity::find_by_id(sale.id.clone())
            .one(db_tx)
            .await?
            .is_some();
        if exists {
            return Err(EngineError::ExistingKey(sale.id.clone()));
        }
        let model: sales::ActiveModel = sale.into();
        model.insert(db_tx).await?;
        Ok(())
    }

    /// Inserts an already built sale. Fails with [`EngineError::ExistingKey`]
    /// if its id is taken; nothing else about the sale is checked.
    pub async fn append_sale(&self, sale: &Sale) -> ResultEngine<()> {
        with_tx!(self, |db_tx| self.append_sale_in(&db_tx, sale).await)
    }

    /// Every sale, oldest first.
    pub async fn list_sales(&self) -> ResultEngine<Vec<Sale>> {
        with_tx!(self, |db_tx| {
            sales::Entity::find()
                .order_by_asc(sales::Column::FechaVenta)
                .order_by_asc(sales::Column::Id)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Sale::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Sales whose stored `product_id` is exactly `product_id`, whether or
    /// not the product still exists.
    pub async fn list_sales_by_product(&self, product_id: &str) -> ResultEngine<Vec<Sale>> {
        let product_id = product_id.trim().to_string();
        with_tx!(self, |db_tx| {
            sales::Entity::find()
                .filter(sales::Column::ProductId.eq(product_id))
                .order_by_asc(sales::Column::FechaVenta)
                .order_by_asc(sales::Column::Id)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Sale::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    pub async fn sale(&self, id: &str) -> ResultEngine<Sale> {
        let id = id.trim().to_string();
        with_tx!(self, |db_tx| {
            let model = sales::Entity::find_by_id(id.clone())
                .one(&db_tx)
                .await?
                .ok_or(EngineError::SaleNotFound(id))?;
            Sale::try_from(model)
        })
    }

    /// Every sale with its product resolved against the current inventory,
    /// most recent first.
    ///
    /// Sales of deleted products are kept and marked
    /// [`ProductStatus::Unavailable`], named from the sale's own snapshot,
    /// the known names table, or a placeholder derived from the id.
    pub async fn sales_history(&self) -> ResultEngine<Vec<SaleHistoryRow>> {
        with_tx!(self, |db_tx| {
            let sales = sales::Entity::find()
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Sale::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;
            let essences: HashMap<String, Essence> = essences::Entity::find()
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|model| Essence::try_from(model).map(|e| (e.id.clone(), e)))
                .collect::<ResultEngine<_>>()?;
            let containers: HashMap<String, Container> = containers::Entity::find()
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|model| Container::try_from(model).map(|c| (c.id.clone(), c)))
                .collect::<ResultEngine<_>>()?;

            let mut sold: HashMap<&str, SoldSoFar> = HashMap::new();
            for sale in &sales {
                let entry = sold.entry(sale.product_id.as_str()).or_default();
                entry.quantity_ml += sale.quantity_ml;
                entry.essence_cost += sale.costs.essence_cost;
            }

            let mut rows: Vec<SaleHistoryRow> = sales
                .iter()
                .map(|sale| {
                    let container_name = sale
                        .container_id
                        .as_ref()
                        .and_then(|id| containers.get(id))
                        .map(|c| c.name.clone());
                    match essences.get(&sale.product_id) {
                        Some(essence) => {
                            let so_far = sold
                                .get(sale.product_id.as_str())
                                .copied()
                                .unwrap_or_default();
                            SaleHistoryRow {
                                sale: sale.clone(),
                                product_name: essence.name.clone(),
                                status: ProductStatus::Available,
                                container_name,
                                recomputed_profit: Some(recomputed_profit(
                                    essence, so_far, sale,
                                )),
                            }
                        }
                        None => SaleHistoryRow {
                            sale: sale.clone(),
                            product_name: recovered_name(sale, &self.known_names),
                            status: ProductStatus::Unavailable,
                            container_name,
                            recomputed_profit: None,
                        },
                    }
                })
                .collect();
            rows.sort_by(|a, b| {
                b.sale
                    .sold_at
                    .cmp(&a.sale.sold_at)
                    .then_with(|| b.sale.id.cmp(&a.sale.id))
            });
            Ok(rows)
        })
    }

    /// Product ids referenced by sales but absent from the essences table,
    /// with their sale counts, most sold first.
    pub async fn detect_orphans(&self) -> ResultEngine<Vec<OrphanedProduct>> {
        with_tx!(self, |db_tx| {
            let stmt = Statement::from_string(
                db_tx.get_database_backend(),
                "SELECT s.product_id AS product_id, COUNT(s.id) AS sale_count \
                 FROM sales s \
                 LEFT JOIN essences e ON e.id = s.product_id \
                 WHERE e.id IS NULL \
                 GROUP BY s.product_id \
                 ORDER BY sale_count DESC, s.product_id ASC",
            );
            let rows = db_tx.query_all(stmt).await?;
            rows.iter()
                .map(|row| {
                    Ok(OrphanedProduct {
                        product_id: row.try_get("", "product_id")?,
                        sale_count: row.try_get("", "sale_count")?,
                    })
                })
                .collect::<ResultEngine<Vec<_>>>()
        })
    }
}

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DatabaseTransaction, EntityTrait};

use crate::{Container, EngineError, Essence, ResultEngine, util::ensure_non_negative};

mod containers;
mod essences;
mod ledger;
mod products;
mod reports;
mod sell;

pub use sell::SaleRequest;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    known_names: HashMap<String, String>,
    default_overhead: Decimal,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Overhead applied to sales that do not carry their own.
    pub fn default_overhead_cost(&self) -> Decimal {
        self.default_overhead
    }

    async fn require_essence(&self, db_tx: &DatabaseTransaction, id: &str) -> ResultEngine<Essence> {
        let model = crate::essences::Entity::find_by_id(id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::EssenceNotFound(id.to_string()))?;
        Essence::try_from(model)
    }

    async fn require_container(
        &self,
        db_tx: &DatabaseTransaction,
        id: &str,
    ) -> ResultEngine<Container> {
        let model = crate::containers::Entity::find_by_id(id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::ContainerNotFound(id.to_string()))?;
        Container::try_from(model)
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    known_names: HashMap<String, String>,
    default_overhead: Decimal,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Display names used for sales whose product no longer exists and
    /// that carry no name of their own.
    pub fn known_product_names(mut self, names: HashMap<String, String>) -> EngineBuilder {
        self.known_names = names;
        self
    }

    /// Overhead charged when a sale request leaves it unset. Defaults to 0.
    pub fn default_overhead_cost(mut self, amount: Decimal) -> EngineBuilder {
        self.default_overhead = amount;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        ensure_non_negative(self.default_overhead, "default overhead cost")?;
        Ok(Engine {
            database: self.database,
            known_names: self.known_names,
            default_overhead: self.default_overhead,
        })
    }
}

use sea_orm::{QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, Essence, EssenceFields, ResultEngine, essences,
    util::{normalize_required, search_key},
};

use super::{Engine, with_tx};

impl Engine {
    /// Adds a new essence under a caller chosen `id`.
    ///
    /// Fails with [`EngineError::ExistingKey`] if the id is taken.
    pub async fn add_essence(&self, id: &str, fields: EssenceFields) -> ResultEngine<Essence> {
        let essence = Essence::new(id, fields)?;
        with_tx!(self, |db_tx| {
            let exists = essences::Entity::find_by_id(essence.id.clone())
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(essence.id));
            }

            let model: essences::ActiveModel = (&essence).into();
            model.insert(&db_tx).await?;
            tracing::debug!(id = %essence.id, name = %essence.name, "essence added");
            Ok(essence)
        })
    }

    /// Replaces every mutable field of an essence. The id stays.
    pub async fn update_essence(&self, id: &str, fields: EssenceFields) -> ResultEngine<Essence> {
        let id = normalize_required(id, "essence id")?;
        with_tx!(self, |db_tx| {
            let mut essence = self.require_essence(&db_tx, &id).await?;
            essence.apply(fields)?;

            let model: essences::ActiveModel = (&essence).into();
            model.update(&db_tx).await?;
            tracing::debug!(id = %essence.id, "essence updated");
            Ok(essence)
        })
    }

    /// Deletes an essence. Its sales stay in the ledger untouched.
    pub async fn delete_essence(&self, id: &str) -> ResultEngine<()> {
        let id = normalize_required(id, "essence id")?;
        with_tx!(self, |db_tx| {
            let result = essences::Entity::delete_by_id(id.clone())
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::EssenceNotFound(id));
            }
            tracing::info!(id = %id, "essence deleted");
            Ok(())
        })
    }

    /// Return the essence with the given id, if any.
    pub async fn essence(&self, id: &str) -> ResultEngine<Option<Essence>> {
        let id = id.trim().to_string();
        with_tx!(self, |db_tx| {
            essences::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .map(Essence::try_from)
                .transpose()
        })
    }

    /// All essences, sorted by id.
    pub async fn list_essences(&self) -> ResultEngine<Vec<Essence>> {
        with_tx!(self, |db_tx| {
            essences::Entity::find()
                .order_by_asc(essences::Column::Id)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Essence::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Essences whose id, name or supplier contains `term`, ignoring case
    /// and accents.
    pub async fn search_essences(&self, term: &str) -> ResultEngine<Vec<Essence>> {
        let needle = search_key(term);
        let essences = self.list_essences().await?;
        Ok(essences
            .into_iter()
            .filter(|essence| {
                [&essence.id, &essence.name, &essence.supplier]
                    .iter()
                    .any(|field| search_key(field).contains(&needle))
            })
            .collect())
    }
}

use sea_orm::{QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Container, ContainerFields, EngineError, ResultEngine, containers,
    util::{normalize_required, search_key},
};

use super::{Engine, with_tx};

impl Engine {
    /// Adds a new container under a caller chosen `id`.
    pub async fn add_container(&self, id: &str, fields: ContainerFields) -> ResultEngine<Container> {
        let container = Container::new(id, fields)?;
        with_tx!(self, |db_tx| {
            let exists = containers::Entity::find_by_id(container.id.clone())
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(container.id));
            }

            let model: containers::ActiveModel = (&container).into();
            model.insert(&db_tx).await?;
            tracing::debug!(id = %container.id, name = %container.name, "container added");
            Ok(container)
        })
    }

    pub async fn update_container(
        &self,
        id: &str,
        fields: ContainerFields,
    ) -> ResultEngine<Container> {
        let id = normalize_required(id, "container id")?;
        with_tx!(self, |db_tx| {
            let mut container = self.require_container(&db_tx, &id).await?;
            container.apply(fields)?;

            let model: containers::ActiveModel = (&container).into();
            model.update(&db_tx).await?;
            tracing::debug!(id = %container.id, "container updated");
            Ok(container)
        })
    }

    /// Deletes a container. Sales that used it keep their `container_id`.
    pub async fn delete_container(&self, id: &str) -> ResultEngine<()> {
        let id = normalize_required(id, "container id")?;
        with_tx!(self, |db_tx| {
            let result = containers::Entity::delete_by_id(id.clone())
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::ContainerNotFound(id));
            }
            tracing::info!(id = %id, "container deleted");
            Ok(())
        })
    }

    pub async fn container(&self, id: &str) -> ResultEngine<Option<Container>> {
        let id = id.trim().to_string();
        with_tx!(self, |db_tx| {
            containers::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .map(Container::try_from)
                .transpose()
        })
    }

    pub async fn list_containers(&self) -> ResultEngine<Vec<Container>> {
        with_tx!(self, |db_tx| {
            containers::Entity::find()
                .order_by_asc(containers::Column::Id)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Container::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Containers whose id or name contains `term`, ignoring case and accents.
    pub async fn search_containers(&self, term: &str) -> ResultEngine<Vec<Container>> {
        let needle = search_key(term);
        let containers = self.list_containers().await?;
        Ok(containers
            .into_iter()
            .filter(|container| {
                search_key(&container.id).contains(&needle)
                    || search_key(&container.name).contains(&needle)
            })
            .collect())
    }
}

//! Tag and ingredient domain service.
//!
//! One generic service handles both label kinds. A `LabelService<R>` serves
//! every label type `L` for which `R` implements [`LabelRepository<L>`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::access_scope::map_label_persistence_error;
use crate::domain::ports::{LabelCommand, LabelQuery, LabelRepository};
use crate::domain::{EntityId, Error, Label, LabelName, OwnerScope, UserId, sort_labels};

/// Label service implementing the label driving ports.
#[derive(Clone)]
pub struct LabelService<R> {
    labels: Arc<R>,
}

impl<R> LabelService<R> {
    /// Create a new service over the given repository.
    pub fn new(labels: Arc<R>) -> Self {
        Self { labels }
    }

    async fn load_owned<L>(&self, owner: &UserId, id: L::Id) -> Result<L, Error>
    where
        L: Label,
        R: LabelRepository<L>,
    {
        let found = self
            .labels
            .find_by_ids(&[id])
            .await
            .map_err(|err| map_label_persistence_error(L::KIND.noun(), err))?
            .into_iter()
            .find(|label| label.id() == id);
        OwnerScope::new(owner)
            .visible(found)
            .ok_or_else(|| Error::not_found(format!("{} {id} not found", L::KIND.noun())))
    }
}

#[async_trait]
impl<L, R> LabelCommand<L> for LabelService<R>
where
    L: Label,
    R: LabelRepository<L>,
{
    async fn create(&self, owner: &UserId, name: LabelName) -> Result<L, Error> {
        let label = L::from_parts(<L::Id as EntityId>::random(), *owner, name);
        self.labels
            .insert(&label)
            .await
            .map_err(|err| map_label_persistence_error(L::KIND.noun(), err))?;
        debug!(kind = L::KIND.noun(), id = %label.id(), "created label");
        Ok(label)
    }

    async fn rename(&self, owner: &UserId, id: L::Id, name: LabelName) -> Result<L, Error> {
        let current: L = self.load_owned(owner, id).await?;
        let renamed = current.renamed(name);
        self.labels
            .update(&renamed)
            .await
            .map_err(|err| map_label_persistence_error(L::KIND.noun(), err))?;
        Ok(renamed)
    }

    async fn delete(&self, owner: &UserId, id: L::Id) -> Result<(), Error> {
        let _: L = self.load_owned(owner, id).await?;
        let removed = self
            .labels
            .delete(&id)
            .await
            .map_err(|err| map_label_persistence_error(L::KIND.noun(), err))?;
        if removed {
            Ok(())
        } else {
            Err(Error::not_found(format!("{} {id} not found", L::KIND.noun())))
        }
    }
}

#[async_trait]
impl<L, R> LabelQuery<L> for LabelService<R>
where
    L: Label,
    R: LabelRepository<L>,
{
    async fn list(&self, owner: &UserId, assigned_only: bool) -> Result<Vec<L>, Error> {
        let found = self
            .labels
            .list_for_owner(owner, assigned_only)
            .await
            .map_err(|err| map_label_persistence_error(L::KIND.noun(), err))?;
        let mut labels = OwnerScope::new(owner).retain(found);
        sort_labels(&mut labels);
        Ok(labels)
    }
}

#[cfg(test)]
#[path = "label_service_tests.rs"]
mod tests;

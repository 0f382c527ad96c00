//! Ownership filtering for related-object lookups.
//!
//! Recipes may only reference the tags and ingredients their author owns.
//! [`OwnerScope`] narrows any candidate collection to the authenticated
//! user's records and resolves requested identifiers against that subset.
//! A reference to another user's record fails exactly like a reference to a
//! record that does not exist, so lookups never reveal what others own.

use std::collections::HashSet;
use std::fmt;

use serde_json::json;

use super::ports::{LabelPersistenceError, LabelRepository};
use super::{EntityId, Error, Label, UserId};

/// Anything that belongs to exactly one user.
pub trait Owned {
    /// Owning user.
    fn owner(&self) -> &UserId;
}

/// Read scope bound to the authenticated owner.
///
/// # Examples
/// ```
/// use recipe_backend::domain::{EntityId, LabelName, OwnerScope, Tag, UserId};
///
/// let alice = UserId::random();
/// let bob = UserId::random();
/// let tags = vec![
///     Tag::new(alice, LabelName::new("Vegan").unwrap()),
///     Tag::new(bob, LabelName::new("Dessert").unwrap()),
/// ];
/// let visible = OwnerScope::new(&alice).retain(tags);
/// assert_eq!(visible.len(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OwnerScope<'a> {
    owner: &'a UserId,
}

impl<'a> OwnerScope<'a> {
    /// Scope lookups to `owner`.
    pub fn new(owner: &'a UserId) -> Self {
        Self { owner }
    }

    /// Authenticated owner.
    pub fn owner(&self) -> &UserId {
        self.owner
    }

    /// Whether `item` is visible in this scope.
    pub fn permits<T: Owned>(&self, item: &T) -> bool {
        item.owner() == self.owner
    }

    /// Keep only the candidates owned by the scope's user, preserving order.
    pub fn retain<T: Owned>(&self, candidates: Vec<T>) -> Vec<T> {
        candidates
            .into_iter()
            .filter(|item| self.permits(item))
            .collect()
    }

    /// Hide an item owned by someone else.
    pub fn visible<T: Owned>(&self, item: Option<T>) -> Option<T> {
        item.filter(|value| self.permits(value))
    }

    /// Resolve requested label ids to the owner's labels.
    ///
    /// Ids are de-duplicated keeping their first occurrence. The result
    /// follows that order. The first id missing from the scoped subset
    /// fails with `invalid_request` naming `field`.
    pub async fn resolve<L, R>(
        &self,
        repo: &R,
        field: &str,
        requested: &[L::Id],
    ) -> Result<Vec<L>, Error>
    where
        L: Label,
        R: LabelRepository<L> + ?Sized,
    {
        let ids = dedupe_ids(requested);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = repo
            .find_by_ids(&ids)
            .await
            .map_err(|err| map_label_persistence_error(L::KIND.noun(), err))?;
        let mut scoped = self.retain(candidates);

        let mut resolved = Vec::with_capacity(ids.len());
        for id in ids {
            let position = scoped
                .iter()
                .position(|label| label.id() == id)
                .ok_or_else(|| reference_not_found(field, id))?;
            resolved.push(scoped.swap_remove(position));
        }
        Ok(resolved)
    }
}

/// Remove repeated ids, keeping the first occurrence of each.
pub fn dedupe_ids<I: EntityId>(ids: &[I]) -> Vec<I> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Validation error for a reference the caller may not use.
pub fn reference_not_found(field: &str, value: impl fmt::Display) -> Error {
    let value = value.to_string();
    Error::invalid_request(format!("{field}: no such object {value}")).with_details(json!({
        "field": field,
        "code": "reference_not_found",
        "value": value,
    }))
}

/// Map label storage failures onto domain errors.
pub(crate) fn map_label_persistence_error(noun: &str, error: LabelPersistenceError) -> Error {
    match error {
        LabelPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("{noun} repository unavailable: {message}"))
        }
        LabelPersistenceError::Query { message } => {
            Error::internal(format!("{noun} repository error: {message}"))
        }
    }
}

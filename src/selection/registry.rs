use std::collections::HashMap;

use crate::error::{Result, TopologyError};
use crate::topology::{DatasetEvent, DatasetId, OutlineStore};

use super::MergeSession;

/// One [`MergeSession`] per open dataset.
///
/// The host calls [`SessionRegistry::create`] when a dataset is opened,
/// [`SessionRegistry::teardown`] when it's closed and
/// [`SessionRegistry::notify`] after every change to a dataset.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<DatasetId, MergeSession>,
    active: Option<DatasetId>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for `store`, creating it if needed.
    pub fn create(&mut self, store: &OutlineStore) -> &mut MergeSession {
        let dataset = store.id();
        self.sessions.entry(dataset).or_insert_with(|| {
            tracing::debug!(%dataset, "created merge session");
            MergeSession::new(dataset)
        })
    }

    /// Removes the session of `dataset`, deactivating it if it was active.
    pub fn teardown(&mut self, dataset: DatasetId) -> Option<MergeSession> {
        if self.active == Some(dataset) {
            self.active = None;
        }
        let removed = self.sessions.remove(&dataset);
        if removed.is_some() {
            tracing::debug!(%dataset, "tore down merge session");
        }
        removed
    }

    #[must_use]
    pub fn get(&self, dataset: DatasetId) -> Option<&MergeSession> {
        self.sessions.get(&dataset)
    }

    pub fn get_mut(&mut self, dataset: DatasetId) -> Option<&mut MergeSession> {
        self.sessions.get_mut(&dataset)
    }

    /// Makes the session of `dataset` the active one, or clears it with `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no session for `dataset`.
    pub fn set_active(&mut self, dataset: Option<DatasetId>) -> Result<()> {
        if let Some(id) = dataset {
            if !self.sessions.contains_key(&id) {
                return Err(
                    TopologyError::EntityNotFound(format!("session for dataset {id}")).into(),
                );
            }
        }
        self.active = dataset;
        Ok(())
    }

    /// The session of the dataset currently being edited.
    #[must_use]
    pub fn active(&self) -> Option<&MergeSession> {
        self.active.and_then(|id| self.sessions.get(&id))
    }

    pub fn active_mut(&mut self) -> Option<&mut MergeSession> {
        self.active.and_then(|id| self.sessions.get_mut(&id))
    }

    /// Forwards a change of `store` to its session. Returns the number of
    /// selected vertices pruned, 0 if `store` has no session.
    ///
    /// # Errors
    ///
    /// See [`MergeSession::on_dataset_event`].
    pub fn notify(&mut self, store: &OutlineStore, event: &DatasetEvent) -> Result<usize> {
        match self.sessions.get_mut(&store.id()) {
            Some(session) => session.on_dataset_event(store, event),
            None => Ok(0),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

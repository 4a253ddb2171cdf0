use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::github::models::Repo;

/// The most recently loaded starred list.
///
/// One writer swaps the whole list in; any number of readers index into it
/// from other threads. Readers only ever see a complete list: either the
/// one before a `replace` or the one after it.
#[derive(Debug, Default)]
pub struct RepoStore {
    repos: RwLock<Arc<[Repo]>>,
}

impl RepoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, repos: Vec<Repo>) {
        let next: Arc<[Repo]> = repos.into();
        let count = next.len();
        *self.repos.write().unwrap_or_else(PoisonError::into_inner) = next;
        debug!(count, "Repo store replaced");
    }

    pub fn clear(&self) {
        self.replace(Vec::new());
    }

    /// The repo at `index`, or `None` when the index is past the end.
    pub fn get(&self, index: usize) -> Option<Repo> {
        self.repos
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.repos.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A consistent view of the whole list. Later replaces do not affect it.
    pub fn snapshot(&self) -> Arc<[Repo]> {
        Arc::clone(&self.repos.read().unwrap_or_else(PoisonError::into_inner))
    }
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::app::details::DetailsController;
use crate::app::dispatch::Dispatcher;
use crate::github::client::RepoSource;

/// Open detail sessions, at most one controller per repository full name.
pub struct DetailsSessions {
    source: Arc<dyn RepoSource>,
    dispatcher: Arc<dyn Dispatcher>,
    open: Mutex<HashMap<String, Arc<DetailsController>>>,
}

impl DetailsSessions {
    pub fn new(source: Arc<dyn RepoSource>, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            source,
            dispatcher,
            open: Mutex::new(HashMap::new()),
        }
    }

    /// The existing session for `full_name`, or a new one that has
    /// already started loading.
    pub fn open(&self, full_name: &str, token: &str) -> Arc<DetailsController> {
        let mut open = self.open.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = open.get(full_name) {
            debug!(repo = full_name, "Reusing open details session");
            return Arc::clone(existing);
        }

        let controller = Arc::new(DetailsController::new(
            Arc::clone(&self.source),
            Arc::clone(&self.dispatcher),
            full_name,
            token,
        ));
        open.insert(full_name.to_string(), Arc::clone(&controller));
        drop(open);

        debug!(repo = full_name, "Opened details session");
        controller.load();
        controller
    }

    /// Forget the session and cancel its fetch. Returns whether one was open.
    pub fn close(&self, full_name: &str) -> bool {
        let removed = self
            .open
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(full_name);
        match removed {
            Some(controller) => {
                controller.close();
                debug!(repo = full_name, "Closed details session");
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, full_name: &str) -> bool {
        self.open
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(full_name)
    }

    pub fn len(&self) -> usize {
        self.open.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

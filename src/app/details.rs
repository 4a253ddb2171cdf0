use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::app::actions::DetailsAction;
use crate::app::dispatch::Dispatcher;
use crate::app::inflight::{LoadGuard, Ticket};
use crate::app::state::DetailsView;
use crate::app::update::update_details;
use crate::github::client::RepoSource;
use crate::github::error::FetchError;

/// Deadline for a single repository lookup.
pub const DETAILS_TIMEOUT: Duration = Duration::from_secs(30);

/// Loads one repository's details in the background.
pub struct DetailsController {
    shared: Arc<Shared>,
}

struct Shared {
    full_name: String,
    token: String,
    source: Arc<dyn RepoSource>,
    dispatcher: Arc<dyn Dispatcher>,
    guard: LoadGuard,
    view: Mutex<DetailsView>,
}

impl DetailsController {
    pub fn new(
        source: Arc<dyn RepoSource>,
        dispatcher: Arc<dyn Dispatcher>,
        full_name: &str,
        token: &str,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                full_name: full_name.to_string(),
                token: token.to_string(),
                source,
                dispatcher,
                guard: LoadGuard::default(),
                view: Mutex::new(DetailsView::new(full_name)),
            }),
        }
    }

    pub fn full_name(&self) -> &str {
        &self.shared.full_name
    }

    /// Start a fetch, superseding any fetch still running.
    ///
    /// Returns immediately; must be called from within a Tokio runtime.
    pub fn load(&self) {
        let ticket = self.shared.guard.begin(DETAILS_TIMEOUT);
        info!(
            repo = %self.shared.full_name,
            generation = ticket.generation,
            "Loading repo details"
        );
        self.shared.publish(&ticket, DetailsAction::Started);

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let outcome = ticket
                .run(
                    shared
                        .source
                        .get_repo_details(&shared.full_name, &shared.token),
                )
                .await;
            let action = match outcome {
                Ok(details) => DetailsAction::Loaded(Box::new(details)),
                Err(e) => {
                    warn!(repo = %shared.full_name, error = %e, "Repo details fetch failed");
                    DetailsAction::Failed(e.user_message())
                }
            };
            shared.publish(&ticket, action);
        });
    }

    /// Cancel the running fetch, if any. Safe to call at any time.
    pub fn cancel(&self) {
        self.shared.guard.cancel();
    }

    /// Cancel, then reset every field to its initial value.
    pub fn clear(&self) {
        let ticket = self.shared.guard.invalidate();
        self.shared.publish(&ticket, DetailsAction::Cleared);
    }

    /// Cancel and stop any running fetch from publishing. Used when the
    /// session goes away while other handles may still be alive.
    pub fn close(&self) {
        self.shared.guard.invalidate();
    }

    pub fn view(&self) -> DetailsView {
        self.shared
            .view
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for DetailsController {
    fn drop(&mut self) {
        self.close();
    }
}

impl Shared {
    fn publish(self: &Arc<Self>, ticket: &Ticket, action: DetailsAction) {
        let shared = Arc::clone(self);
        let ticket = ticket.clone();
        self.dispatcher
            .dispatch(Box::new(move || shared.apply(&ticket, action)));
    }

    fn apply(&self, ticket: &Ticket, action: DetailsAction) {
        let mut view = self.view.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.guard.is_current(ticket) {
            debug!(
                repo = %self.full_name,
                generation = ticket.generation,
                "Dropping superseded details update"
            );
            return;
        }

        let action = match action {
            DetailsAction::Loaded(_) if ticket.is_cancelled() => {
                DetailsAction::Failed(FetchError::Canceled.user_message())
            }
            other => other,
        };
        update_details(&mut view, &self.full_name, action);
    }
}

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::app::actions::StarsAction;
use crate::app::dispatch::Dispatcher;
use crate::app::inflight::{LoadGuard, Ticket};
use crate::app::state::StarsView;
use crate::app::update::update_stars;
use crate::github::client::{MAX_PER_PAGE, RepoSource};
use crate::github::error::{FetchError, Result};
use crate::github::models::Repo;
use crate::store::RepoStore;

/// Deadline for one complete starred-list fetch, all pages included.
pub const STARS_TIMEOUT: Duration = Duration::from_secs(45);

/// What the next `load` will ask for. Edited freely between loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarsQuery {
    pub username: String,
    pub token: String,
    pub per_page: String,
}

impl Default for StarsQuery {
    fn default() -> Self {
        Self {
            username: String::new(),
            token: String::new(),
            per_page: MAX_PER_PAGE.to_string(),
        }
    }
}

/// Loads a user's starred repositories in the background.
///
/// Only the most recent `load` may publish. Results land in a
/// [`RepoStore`] that other threads can index while the next fetch runs.
/// Dropping the controller cancels whatever is in flight.
pub struct StarsController {
    shared: Arc<Shared>,
}

struct Shared {
    source: Arc<dyn RepoSource>,
    dispatcher: Arc<dyn Dispatcher>,
    guard: LoadGuard,
    query: Mutex<StarsQuery>,
    view: Mutex<StarsView>,
    store: RepoStore,
}

impl StarsController {
    pub fn new(source: Arc<dyn RepoSource>, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            shared: Arc::new(Shared {
                source,
                dispatcher,
                guard: LoadGuard::default(),
                query: Mutex::new(StarsQuery::default()),
                view: Mutex::new(StarsView::default()),
                store: RepoStore::new(),
            }),
        }
    }

    pub fn set_query(&self, query: StarsQuery) {
        *self
            .shared
            .query
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = query;
    }

    pub fn query(&self) -> StarsQuery {
        self.shared
            .query
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Start a fetch, superseding any fetch still running.
    ///
    /// Returns immediately; must be called from within a Tokio runtime.
    pub fn load(&self) {
        let ticket = self.shared.guard.begin(STARS_TIMEOUT);
        info!(generation = ticket.generation, "Loading starred repos");
        self.shared.publish(&ticket, StarsAction::Started);

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let outcome = shared.fetch(&ticket).await;
            let action = match outcome {
                Ok(repos) => {
                    debug!(
                        generation = ticket.generation,
                        count = repos.len(),
                        "Starred fetch finished"
                    );
                    StarsAction::Loaded(repos)
                }
                Err(e) => {
                    warn!(generation = ticket.generation, error = %e, "Starred fetch failed");
                    StarsAction::Failed(e.user_message())
                }
            };
            shared.publish(&ticket, action);
        });
    }

    /// Cancel the running fetch, if any. Safe to call at any time.
    pub fn cancel(&self) {
        self.shared.guard.cancel();
    }

    /// Cancel, then reset to an empty list with status `Cleared`.
    pub fn clear(&self) {
        let ticket = self.shared.guard.invalidate();
        info!("Clearing starred repos");
        self.shared.publish(&ticket, StarsAction::Cleared);
    }

    pub fn view(&self) -> StarsView {
        self.shared
            .view
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn repo_at(&self, index: usize) -> Option<Repo> {
        self.shared.store.get(index)
    }

    pub fn store(&self) -> &RepoStore {
        &self.shared.store
    }
}

impl Drop for StarsController {
    fn drop(&mut self) {
        self.shared.guard.invalidate();
    }
}

impl Shared {
    async fn fetch(&self, ticket: &Ticket) -> Result<Vec<Repo>> {
        let query = self
            .query
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let per_page = parse_per_page(&query.per_page)?;

        ticket
            .run(
                self.source
                    .list_starred(&query.username, &query.token, per_page),
            )
            .await
    }

    fn publish(self: &Arc<Self>, ticket: &Ticket, action: StarsAction) {
        let shared = Arc::clone(self);
        let ticket = ticket.clone();
        self.dispatcher
            .dispatch(Box::new(move || shared.apply(&ticket, action)));
    }

    fn apply(&self, ticket: &Ticket, action: StarsAction) {
        let mut view = self.view.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.guard.is_current(ticket) {
            debug!(
                generation = ticket.generation,
                "Dropping superseded starred update"
            );
            return;
        }

        // A success that raced its own cancellation never reaches the view.
        let action = match action {
            StarsAction::Loaded(_) if ticket.is_cancelled() => {
                StarsAction::Failed(FetchError::Canceled.user_message())
            }
            other => other,
        };
        update_stars(&mut view, &self.store, action);
    }
}

/// Blank means the maximum; anything else must be a number in 1..=100.
pub fn parse_per_page(value: &str) -> Result<u32> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(MAX_PER_PAGE);
    }
    let per_page: i64 = value
        .parse()
        .map_err(|_| FetchError::validation("per page must be a number"))?;
    if !(1..=i64::from(MAX_PER_PAGE)).contains(&per_page) {
        return Err(FetchError::validation("per page must be between 1 and 100"));
    }
    Ok(per_page as u32)
}

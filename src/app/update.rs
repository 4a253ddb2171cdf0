use crate::app::actions::{DetailsAction, StarsAction};
use crate::app::state::{
    DetailFields, DetailsView, LoadState, STATUS_CLEARED, STATUS_FAILED, STATUS_LOADED,
    STATUS_LOADING, StarsView,
};
use crate::store::RepoStore;

pub fn update_stars(view: &mut StarsView, store: &RepoStore, action: StarsAction) {
    match action {
        StarsAction::Started => {
            view.load_state = LoadState::Loading;
            view.loading = true;
            view.error.clear();
            view.status = STATUS_LOADING.to_string();
        }
        StarsAction::Loaded(repos) => {
            store.replace(repos);
            view.repo_count = store.len();
            view.load_state = LoadState::Loaded;
            view.loading = false;
            view.status = STATUS_LOADED.to_string();
        }
        StarsAction::Failed(msg) => {
            // The previous list stays readable after a failed refresh.
            view.load_state = LoadState::Failed;
            view.loading = false;
            view.error = msg;
            view.status = STATUS_FAILED.to_string();
        }
        StarsAction::Cleared => {
            store.clear();
            view.repo_count = 0;
            view.load_state = LoadState::Idle;
            view.loading = false;
            view.error.clear();
            view.status = STATUS_CLEARED.to_string();
        }
    }
}

pub fn update_details(view: &mut DetailsView, full_name: &str, action: DetailsAction) {
    match action {
        DetailsAction::Started => {
            view.load_state = LoadState::Loading;
            view.loading = true;
            view.error.clear();
            view.status = STATUS_LOADING.to_string();
        }
        DetailsAction::Loaded(details) => {
            view.fields = DetailFields::from(details.as_ref());
            view.load_state = LoadState::Loaded;
            view.loading = false;
            view.status = STATUS_LOADED.to_string();
        }
        DetailsAction::Failed(msg) => {
            view.load_state = LoadState::Failed;
            view.loading = false;
            view.error = msg;
            view.status = STATUS_FAILED.to_string();
        }
        DetailsAction::Cleared => {
            view.fields = DetailFields::pending(full_name);
            view.load_state = LoadState::Idle;
            view.loading = false;
            view.error.clear();
            view.status = STATUS_CLEARED.to_string();
        }
    }
}

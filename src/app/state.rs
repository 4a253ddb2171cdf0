use crate::github::models::RepoDetails;
use crate::util::format::{bool_label, format_time, join_topics, value_or_dash};

pub const STATUS_READY: &str = "Ready";
pub const STATUS_LOADING: &str = "Loading...";
pub const STATUS_LOADED: &str = "Loaded";
pub const STATUS_FAILED: &str = "Load failed";
pub const STATUS_CLEARED: &str = "Cleared";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

impl LoadState {
    /// A fetch has finished, one way or the other.
    pub fn is_settled(self) -> bool {
        matches!(self, LoadState::Loaded | LoadState::Failed)
    }
}

/// What a consumer of the starred list can observe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarsView {
    pub load_state: LoadState,
    pub loading: bool,
    pub status: String,
    pub error: String,
    pub repo_count: usize,
}

impl Default for StarsView {
    fn default() -> Self {
        Self {
            load_state: LoadState::Idle,
            loading: false,
            status: STATUS_READY.to_string(),
            error: String::new(),
            repo_count: 0,
        }
    }
}

/// What a consumer of one repository's details can observe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsView {
    pub load_state: LoadState,
    pub loading: bool,
    pub status: String,
    pub error: String,
    pub fields: DetailFields,
}

impl DetailsView {
    pub fn new(full_name: &str) -> Self {
        Self {
            load_state: LoadState::Idle,
            loading: false,
            status: STATUS_READY.to_string(),
            error: String::new(),
            fields: DetailFields::pending(full_name),
        }
    }
}

/// Display-ready text for every detail field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailFields {
    pub name: String,
    pub description: String,
    pub language: String,
    pub homepage: String,
    pub default_branch: String,
    pub license: String,
    pub topics: String,
    pub stars: String,
    pub forks: String,
    pub watchers: String,
    pub open_issues: String,
    pub size: String,
    pub updated_at: String,
    pub created_at: String,
    pub pushed_at: String,
    pub private: String,
    pub html_url: String,
}

impl DetailFields {
    /// Nothing loaded yet: only the requested name is known.
    pub fn pending(full_name: &str) -> Self {
        Self {
            name: full_name.to_string(),
            ..Self::default()
        }
    }

    pub fn rows(&self) -> [(&'static str, &str); 17] {
        [
            ("Full Name", self.name.as_str()),
            ("Description", self.description.as_str()),
            ("Language", self.language.as_str()),
            ("Stars", self.stars.as_str()),
            ("Forks", self.forks.as_str()),
            ("Watchers", self.watchers.as_str()),
            ("Open Issues", self.open_issues.as_str()),
            ("Default Branch", self.default_branch.as_str()),
            ("License", self.license.as_str()),
            ("Topics", self.topics.as_str()),
            ("Homepage", self.homepage.as_str()),
            ("HTML URL", self.html_url.as_str()),
            ("Private", self.private.as_str()),
            ("Size", self.size.as_str()),
            ("Updated", self.updated_at.as_str()),
            ("Created", self.created_at.as_str()),
            ("Pushed", self.pushed_at.as_str()),
        ]
    }
}

impl From<&RepoDetails> for DetailFields {
    fn from(repo: &RepoDetails) -> Self {
        Self {
            name: value_or_dash(&repo.full_name),
            description: value_or_dash(&repo.description),
            language: value_or_dash(&repo.language),
            homepage: value_or_dash(&repo.homepage),
            default_branch: value_or_dash(&repo.default_branch),
            license: value_or_dash(&repo.license),
            topics: join_topics(&repo.topics),
            stars: repo.stars.to_string(),
            forks: repo.forks.to_string(),
            watchers: repo.watchers.to_string(),
            open_issues: repo.open_issues.to_string(),
            size: repo.size.to_string(),
            updated_at: format_time(repo.updated_at),
            created_at: format_time(repo.created_at),
            pushed_at: format_time(repo.pushed_at),
            private: bool_label(repo.private).to_string(),
            html_url: value_or_dash(&repo.html_url),
        }
    }
}

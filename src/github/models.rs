use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a user's starred list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub full_name: String,
    pub html_url: String,
    pub description: String,
    pub language: String,
    pub stars: u64,
    pub forks: u64,
    pub updated_at: Option<DateTime<Utc>>,
    pub private: bool,
}

/// Everything shown on a repository's detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoDetails {
    pub full_name: String,
    pub html_url: String,
    pub description: String,
    pub language: String,
    pub homepage: String,
    pub default_branch: String,
    /// Empty when the repository has no license.
    pub license: String,
    pub topics: Vec<String>,
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub open_issues: u64,
    pub size: u64,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub private: bool,
}

// REST payloads. GitHub sends `null` for many of these, so everything is
// optional on the wire and collapses to the zero value on conversion.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RepoPayload {
    full_name: Option<String>,
    html_url: Option<String>,
    description: Option<String>,
    language: Option<String>,
    stargazers_count: Option<u64>,
    forks_count: Option<u64>,
    updated_at: Option<String>,
    private: Option<bool>,
}

impl From<RepoPayload> for Repo {
    fn from(p: RepoPayload) -> Self {
        Repo {
            full_name: p.full_name.unwrap_or_default(),
            html_url: p.html_url.unwrap_or_default(),
            description: p.description.unwrap_or_default(),
            language: p.language.unwrap_or_default(),
            stars: p.stargazers_count.unwrap_or(0),
            forks: p.forks_count.unwrap_or(0),
            updated_at: parse_timestamp(p.updated_at.as_deref()),
            private: p.private.unwrap_or(false),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RepoDetailsPayload {
    full_name: Option<String>,
    html_url: Option<String>,
    description: Option<String>,
    language: Option<String>,
    homepage: Option<String>,
    default_branch: Option<String>,
    topics: Option<Vec<String>>,
    stargazers_count: Option<u64>,
    forks_count: Option<u64>,
    watchers_count: Option<u64>,
    open_issues_count: Option<u64>,
    size: Option<u64>,
    updated_at: Option<String>,
    created_at: Option<String>,
    pushed_at: Option<String>,
    private: Option<bool>,
    license: Option<LicensePayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LicensePayload {
    name: Option<String>,
}

impl From<RepoDetailsPayload> for RepoDetails {
    fn from(p: RepoDetailsPayload) -> Self {
        RepoDetails {
            full_name: p.full_name.unwrap_or_default(),
            html_url: p.html_url.unwrap_or_default(),
            description: p.description.unwrap_or_default(),
            language: p.language.unwrap_or_default(),
            homepage: p.homepage.unwrap_or_default(),
            default_branch: p.default_branch.unwrap_or_default(),
            license: p.license.and_then(|l| l.name).unwrap_or_default(),
            topics: p.topics.unwrap_or_default(),
            stars: p.stargazers_count.unwrap_or(0),
            forks: p.forks_count.unwrap_or(0),
            watchers: p.watchers_count.unwrap_or(0),
            open_issues: p.open_issues_count.unwrap_or(0),
            size: p.size.unwrap_or(0),
            updated_at: parse_timestamp(p.updated_at.as_deref()),
            created_at: parse_timestamp(p.created_at.as_deref()),
            pushed_at: parse_timestamp(p.pushed_at.as_deref()),
            private: p.private.unwrap_or(false),
        }
    }
}

/// Error body GitHub attaches to non-2xx responses.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ApiErrorPayload {
    pub message: Option<String>,
    pub documentation_url: Option<String>,
}

/// Unparseable or missing timestamps become `None` rather than an error.
fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| s.parse().ok())
}

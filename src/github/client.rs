use std::time::Duration;

use anyhow::{Context, bail};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::{FetchError, Result};
use super::models::{ApiErrorPayload, Repo, RepoDetails, RepoDetailsPayload, RepoPayload};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const USER_AGENT: &str = "ghstars";
pub const MAX_PER_PAGE: u32 = 100;

const GITHUB_JSON: &str = "application/vnd.github+json";
// Only this much of an error body is kept for the message.
const MAX_ERROR_BODY: usize = 64 * 1024;

/// The two remote operations the controllers depend on.
///
/// `GithubClient` talks to the REST API; tests swap in their own source.
/// An empty `token` means anonymous access.
#[async_trait]
pub trait RepoSource: Send + Sync {
    async fn list_starred(&self, username: &str, token: &str, per_page: u32) -> Result<Vec<Repo>>;

    async fn get_repo_details(&self, full_name: &str, token: &str) -> Result<RepoDetails>;
}

#[derive(Clone, Debug)]
pub struct GithubClient {
    client: Client,
    base: Url,
}

impl GithubClient {
    pub fn new(api_url: &str, request_timeout: Duration) -> anyhow::Result<Self> {
        let base = Url::parse(api_url)
            .with_context(|| format!("Invalid GitHub API URL: {}", api_url))?;
        if base.scheme() != "https" && !is_loopback(&base) {
            bail!("GitHub API URL must use HTTPS: {}", api_url);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // http(s) URLs always have a path, so this only fails for
        // cannot-be-a-base URLs which `new` never accepts.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, token: &str) -> Result<T> {
        let mut request = self.client.get(url).header(ACCEPT, GITHUB_JSON);
        if !token.is_empty() {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if status.as_u16() >= 300 {
            let body = resp.bytes().await.unwrap_or_default();
            let body = String::from_utf8_lossy(&body[..body.len().min(MAX_ERROR_BODY)]);
            return Err(api_error(status, &body));
        }

        resp.json::<T>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RepoSource for GithubClient {
    async fn list_starred(&self, username: &str, token: &str, per_page: u32) -> Result<Vec<Repo>> {
        let username = username.trim();
        if username.is_empty() {
            return Err(FetchError::validation("username is required"));
        }
        let per_page = clamp_per_page(per_page);

        let mut all = Vec::new();
        // No page cap: a short or empty page is the only stop signal.
        for page in 1u32.. {
            let mut url = self.endpoint(&["users", username, "starred"]);
            url.query_pairs_mut()
                .append_pair("per_page", &per_page.to_string())
                .append_pair("page", &page.to_string());

            let batch: Vec<RepoPayload> = self.get_json(url, token).await?;
            let count = batch.len();
            debug!(user = username, page, count, "Fetched starred page");

            all.extend(batch.into_iter().map(Repo::from));
            if count < per_page as usize {
                break;
            }
        }

        debug!(user = username, count = all.len(), "Fetched starred repos");
        Ok(all)
    }

    async fn get_repo_details(&self, full_name: &str, token: &str) -> Result<RepoDetails> {
        let (owner, name) = split_full_name(full_name)?;
        let url = self.endpoint(&["repos", owner, name]);

        let payload: RepoDetailsPayload = self.get_json(url, token).await?;
        debug!(repo = full_name, "Fetched repo details");
        Ok(payload.into())
    }
}

/// Out-of-range page sizes fall back to the maximum instead of failing.
pub fn clamp_per_page(per_page: u32) -> u32 {
    if per_page == 0 || per_page > MAX_PER_PAGE {
        MAX_PER_PAGE
    } else {
        per_page
    }
}

/// Split `owner/name`, rejecting anything that is not exactly two
/// non-empty segments.
pub fn split_full_name(full_name: &str) -> Result<(&str, &str)> {
    if full_name.trim().is_empty() {
        return Err(FetchError::validation("repo full name is required"));
    }
    let mut parts = full_name.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
            Ok((owner, name))
        }
        _ => Err(FetchError::validation("full name must be owner/name")),
    }
}

fn api_error(status: StatusCode, body: &str) -> FetchError {
    let mut message = body.trim().to_string();
    if let Ok(payload) = serde_json::from_str::<ApiErrorPayload>(body)
        && let Some(msg) = payload.message.filter(|m| !m.is_empty())
    {
        message = match payload.documentation_url.filter(|u| !u.is_empty()) {
            Some(url) => format!("{} ({})", msg, url),
            None => msg,
        };
    }
    if message.is_empty() {
        message = "unknown error".to_string();
    }

    FetchError::Api {
        status: status.to_string(),
        message,
    }
}

fn is_loopback(url: &Url) -> bool {
    matches!(
        url.host_str(),
        Some("localhost") | Some("127.0.0.1") | Some("[::1]")
    )
}

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use ghstars::github::{FetchError, Repo, RepoDetails, RepoSource};

pub fn sample_repo() -> Repo {
    Repo {
        full_name: "golang/go".into(),
        html_url: "https://github.com/golang/go".into(),
        description: "The Go programming language".into(),
        language: "Go".into(),
        stars: 123456,
        forks: 12345,
        updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single(),
        private: false,
    }
}

pub fn sample_repo_list() -> Vec<Repo> {
    vec![
        sample_repo(),
        Repo {
            full_name: "kubernetes/kubernetes".into(),
            html_url: "https://github.com/kubernetes/kubernetes".into(),
            description: "Production-Grade Container Scheduling and Management".into(),
            language: "Go".into(),
            stars: 98765,
            forks: 32100,
            updated_at: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).single(),
            private: false,
        },
        Repo {
            full_name: "microsoft/vscode".into(),
            html_url: "https://github.com/microsoft/vscode".into(),
            description: "Visual Studio Code".into(),
            language: "TypeScript".into(),
            stars: 154000,
            forks: 27500,
            updated_at: Utc.with_ymd_and_hms(2024, 1, 20, 12, 0, 0).single(),
            private: false,
        },
    ]
}

pub fn sample_repo_details() -> RepoDetails {
    RepoDetails {
        full_name: "golang/go".into(),
        html_url: "https://github.com/golang/go".into(),
        description: "The Go programming language".into(),
        language: "Go".into(),
        homepage: "https://go.dev".into(),
        default_branch: "main".into(),
        license: "BSD 3-Clause".into(),
        topics: vec![
            "go".into(),
            "golang".into(),
            "programming-language".into(),
            "compiler".into(),
        ],
        stars: 123456,
        forks: 12345,
        watchers: 5000,
        open_issues: 3500,
        size: 250000,
        updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single(),
        created_at: Utc.with_ymd_and_hms(2009, 11, 10, 23, 0, 0).single(),
        pushed_at: Utc.with_ymd_and_hms(2024, 1, 1, 11, 30, 0).single(),
        private: false,
    }
}

pub fn sample_repo_details_minimal() -> RepoDetails {
    RepoDetails {
        full_name: "user/minimal-repo".into(),
        html_url: "https://github.com/user/minimal-repo".into(),
        default_branch: "master".into(),
        size: 10,
        updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single(),
        pushed_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single(),
        ..Default::default()
    }
}

pub const INVALID_FULL_NAMES: [&str; 5] = ["", "no-slash", "/no-owner", "no-repo/", "too/many/parts"];

/// One scripted response: wait `delay`, then return `result`.
pub struct Step<T> {
    pub delay: Duration,
    pub result: Result<T, FetchError>,
}

impl<T> Step<T> {
    pub fn ok(value: T) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(value),
        }
    }

    pub fn err(err: FetchError) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(err),
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A `RepoSource` that replays scripted steps in call order and counts
/// calls. A call past the end of the script repeats `fallback_*`, or fails.
#[derive(Default)]
pub struct ScriptedSource {
    starred: Mutex<VecDeque<Step<Vec<Repo>>>>,
    details: Mutex<VecDeque<Step<RepoDetails>>>,
    fallback_starred: Mutex<Option<(Duration, Vec<Repo>)>>,
    starred_calls: AtomicUsize,
    details_calls: AtomicUsize,
    finished: AtomicUsize,
    last_per_page: AtomicU32,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_starred(&self, step: Step<Vec<Repo>>) -> &Self {
        self.starred.lock().unwrap().push_back(step);
        self
    }

    pub fn push_details(&self, step: Step<RepoDetails>) -> &Self {
        self.details.lock().unwrap().push_back(step);
        self
    }

    pub fn always_starred(&self, delay: Duration, repos: Vec<Repo>) -> &Self {
        *self.fallback_starred.lock().unwrap() = Some((delay, repos));
        self
    }

    pub fn starred_calls(&self) -> usize {
        self.starred_calls.load(Ordering::SeqCst)
    }

    pub fn details_calls(&self) -> usize {
        self.details_calls.load(Ordering::SeqCst)
    }

    /// Calls that ran to the end of their delay instead of being dropped.
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }

    pub fn last_per_page(&self) -> u32 {
        self.last_per_page.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RepoSource for ScriptedSource {
    async fn list_starred(
        &self,
        _username: &str,
        _token: &str,
        per_page: u32,
    ) -> Result<Vec<Repo>, FetchError> {
        self.starred_calls.fetch_add(1, Ordering::SeqCst);
        self.last_per_page.store(per_page, Ordering::SeqCst);

        let step = self.starred.lock().unwrap().pop_front();
        let step = match step {
            Some(step) => step,
            None => match self.fallback_starred.lock().unwrap().clone() {
                Some((delay, repos)) => Step::ok(repos).after(delay),
                None => Step::err(FetchError::Transport("list_starred not scripted".into())),
            },
        };

        tokio::time::sleep(step.delay).await;
        self.finished.fetch_add(1, Ordering::SeqCst);
        step.result
    }

    async fn get_repo_details(
        &self,
        _full_name: &str,
        _token: &str,
    ) -> Result<RepoDetails, FetchError> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);

        let step = self.details.lock().unwrap().pop_front().unwrap_or_else(|| {
            Step::err(FetchError::Transport("get_repo_details not scripted".into()))
        });

        tokio::time::sleep(step.delay).await;
        self.finished.fetch_add(1, Ordering::SeqCst);
        step.result
    }
}

/// Poll `cond` until it holds, failing the test after five seconds.
pub async fn wait_until(mut cond: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

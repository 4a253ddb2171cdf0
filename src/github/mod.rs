pub mod auth;
pub mod client;
pub mod error;
pub mod models;

pub use client::{GithubClient, RepoSource};
pub use error::FetchError;
pub use models::*;

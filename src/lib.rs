//! Browse a GitHub user's starred repositories and load repository details
//! in the background, with stale fetches superseded by newer ones.

pub mod app;
pub mod github;
pub mod store;
pub mod util;

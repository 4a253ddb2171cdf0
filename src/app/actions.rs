use crate::github::models::{Repo, RepoDetails};

#[derive(Debug)]
pub enum StarsAction {
    Started,
    Loaded(Vec<Repo>),
    Failed(String),
    Cleared,
}

#[derive(Debug)]
pub enum DetailsAction {
    Started,
    Loaded(Box<RepoDetails>),
    Failed(String),
    Cleared,
}

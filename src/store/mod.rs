pub mod repos;

pub use repos::RepoStore;

#![forbid(unsafe_code)]

pub mod fixtures;
pub mod repository;

pub use fixtures::FixtureSet;
pub use repository::{InMemoryRepository, QuestionRepository, Storage, StorageError, TestRepository};

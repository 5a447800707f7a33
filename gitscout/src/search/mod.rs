//! Repository search: pattern construction, log retrieval and the worker pool.
//!
//! Every repository is one task. A task runs `git log` inside its repository,
//! keeps the lines matching the word's pattern and hands them to the caller's
//! sink. Tasks share nothing mutable except atomic counters, and at most
//! `thread_count` of them run at once.
pub mod engine;
pub mod log;
pub mod matcher;

pub use engine::{search, search_repositories, search_repository};
pub use log::LogReader;
pub use matcher::PatternMatcher;

// Library root: re-exports all modules so integration tests and the
// `roundup` binary share the same public API.

pub mod cache;
pub mod config;
pub mod export;
pub mod jobs;
pub mod provider;
pub mod report;

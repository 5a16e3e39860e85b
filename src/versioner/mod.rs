//! Single-file versioning on top of an embedded git repository.
//!
//! - `repository` - FileVersioner handle and repository acquisition
//! - `recording` - staging, commits, push/pull
//! - `history` - per-file history walks and revision restore

pub mod history;
pub mod recording;
pub mod repository;


pub use repository::FileVersioner;

//! file-versioner - version individual files inside a git repository.
//!
//! A thin convenience layer over libgit2: acquire a repository (open, init,
//! or clone), record versions of a single file (stage, commit, optionally
//! push), list the commits that touched it, and materialize an old revision
//! back to disk.
//!
//! All operations are synchronous and blocking. A [`FileVersioner`]
//! exclusively owns its repository handle; pointing two instances at the
//! same local path is not supported.
//!
//! ```no_run
//! use file_versioner::{FileVersioner, VersionerConfig};
//!
//! # fn main() -> file_versioner::Result<()> {
//! let versioner = FileVersioner::open(VersionerConfig::new("/tmp/notes"))?;
//! versioner.record_version("notes.txt", "first draft")?;
//! for version in versioner.list_versions("notes.txt")? {
//!     println!("{} {} {}", version.timestamp, version.commit_id, version.author);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod versioner;

pub use config::{Acquisition, RemoteConfig, VersionerConfig};
pub use error::{Result, VersionerError};
pub use models::{RecordOutcome, VersionRecord};
pub use versioner::FileVersioner;

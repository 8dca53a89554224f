pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod notion;
pub mod progress;
pub mod scanner;
pub mod sync;

pub use config::AppConfig;
pub use engine::{RunResult, SyncEngine};
pub use error::Error;
pub use model::{SessionRecord, SessionStatus, StatusTally};
pub use progress::{ProgressReporter, SilentReporter};
pub use sync::{RemoteEntry, SessionStore};

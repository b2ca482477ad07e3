use std::path::PathBuf;

use thiserror::Error;

mod cache;
mod loader;
mod schema;

pub use cache::ReportCache;
pub use loader::load_report;
use schema::normalize_report;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("report file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid JSON: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} does not contain a JSON object at the top level", .0.display())]
    NotAnObject(PathBuf),
}

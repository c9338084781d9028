use std::path::PathBuf;

mod worker;

pub use worker::{spawn_worker, worker_task};

// Re-export types from the analysis crate
pub use inkkey_core::{ImageSource, InkLevels, InkSummary, ProcessingOptions};

/// Commands sent from a front-end to the worker
#[derive(Debug)]
pub enum InkCommand {
    /// Analyze an image. A newer `Analyze` of the same source that is
    /// already queued supersedes this one.
    Analyze {
        request_id: RequestId,
        source: ImageSource,
        options: ProcessingOptions,
    },
    LoadConfig {
        path: PathBuf,
    },
}

/// Updates sent from the worker back to the front-end
#[derive(Debug, Clone)]
pub enum InkUpdate {
    Started {
        request_id: RequestId,
    },
    Completed {
        request_id: RequestId,
        levels: InkLevels,
        summary: InkSummary,
    },
    /// Dropped without running because a newer request for the same image arrived
    Superseded {
        request_id: RequestId,
    },
    ConfigLoaded {
        options: ProcessingOptions,
    },
    Error {
        request_id: Option<RequestId>,
        message: String,
    },
}

/// Caller-chosen handle tying updates back to the request that caused them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

// Content engine interface and the local file loader behind it
pub mod url;
pub mod worker;

pub use self::url::{create_url, Target, DEFAULT_SEARCH_ENGINE};
pub use worker::{spawn_worker, WorkerEngine};

use crate::state::TabId;
use std::path::PathBuf;

/// Loads what tabs show. Results come back as [`EngineEvent`]s.
pub trait ContentEngine {
    fn load(&self, tab: TabId, target: Target);

    fn stop(&self, tab: TabId);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    LoadStarted(TabId),
    LoadProgress {
        tab: TabId,
        percent: u8,
    },
    LoadFinished {
        tab: TabId,
        path: PathBuf,
        content: String,
    },
    LoadFailed {
        tab: TabId,
        reason: String,
    },
}

impl EngineEvent {
    pub fn tab(&self) -> TabId {
        match self {
            EngineEvent::LoadStarted(tab) => *tab,
            EngineEvent::LoadProgress { tab, .. }
            | EngineEvent::LoadFinished { tab, .. }
            | EngineEvent::LoadFailed { tab, .. } => *tab,
        }
    }
}

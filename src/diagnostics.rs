// 📣 Diagnostics Sink - leveled messages, injected by the entry point
//
// Components never log through globals. The binary builds one sink and
// hands it to every phase; tests use MemoryDiagnostics to inspect output.

use std::cell::RefCell;
use tracing::Level;

// ============================================================================
// SINK TRAIT
// ============================================================================

/// Anything that accepts leveled diagnostic messages.
pub trait Diagnostics {
    fn log(&self, level: Level, message: &str);

    fn trace(&self, message: &str) {
        self.log(Level::TRACE, message);
    }

    fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::ERROR, message);
    }
}

// ============================================================================
// TRACING SINK
// ============================================================================

/// Forwards every message to the `tracing` subscriber installed by `main`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn log(&self, level: Level, message: &str) {
        if level == Level::TRACE {
            tracing::trace!("{}", message);
        } else if level == Level::DEBUG {
            tracing::debug!("{}", message);
        } else if level == Level::INFO {
            tracing::info!("{}", message);
        } else if level == Level::WARN {
            tracing::warn!("{}", message);
        } else {
            tracing::error!("{}", message);
        }
    }
}

// ============================================================================
// IN-MEMORY SINK
// ============================================================================

/// Keeps every message in order. Used by tests and by callers that want to
/// inspect what a run reported.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    entries: RefCell<Vec<(Level, String)>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.borrow().clone()
    }

    /// Messages logged at exactly `level`
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn contains(&self, level: Level, fragment: &str) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|(l, m)| *l == level && m.contains(fragment))
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn log(&self, level: Level, message: &str) {
        self.entries.borrow_mut().push((level, message.to_string()));
    }
}

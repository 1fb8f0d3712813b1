use crate::debugger::breakpoint::BreakpointActor;
use crate::source::SourceActor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub source: SourceActor,
    pub line: u32,
}

impl Location {
    pub fn new(source: SourceActor, line: u32) -> Self {
        Self { source, line }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.line)
    }
}

/// Why execution stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PauseReason {
    /// One or more breakpoints share the location; all of them are reported.
    Breakpoint { actors: Vec<BreakpointActor> },
    DebuggerStatement,
}

impl PauseReason {
    pub fn kind(&self) -> &'static str {
        match self {
            PauseReason::Breakpoint { .. } => "breakpoint",
            PauseReason::DebuggerStatement => "debuggerStatement",
        }
    }

    pub fn actors(&self) -> &[BreakpointActor] {
        match self {
            PauseReason::Breakpoint { actors } => actors,
            PauseReason::DebuggerStatement => &[],
        }
    }
}

/// A single pause, delivered once to the session's subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PauseEvent {
    pub reason: PauseReason,
    pub location: Location,
}

/// Notifications a session sends to its one subscriber, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadEvent {
    NewSource { actor: SourceActor, url: String },
    Paused(PauseEvent),
    Exited,
}

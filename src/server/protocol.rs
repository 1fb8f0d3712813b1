use crate::debugger::{Breakpoint, BreakpointActor, Location, PauseEvent, ThreadEvent, ThreadState};
use crate::source::{Source, SourceActor};
use serde::{Deserialize, Serialize};

/// Wire protocol messages for remote debugging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DebugRequest {
    /// Authenticate with the server
    Authenticate { token: String },

    /// Register script text; its statements run when the thread resumes.
    /// `debugger_lines` replaces `debugger` statement detection when given.
    LoadSource {
        url: String,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        debugger_lines: Option<Vec<u32>>,
    },

    /// List registered sources
    ListSources,

    /// Set a breakpoint; `source` is a source actor such as `source1`
    SetBreakpoint { source: String, line: u32 },

    /// Remove a breakpoint by actor
    RemoveBreakpoint { actor: String },

    /// List all breakpoints
    ListBreakpoints,

    /// Run until the next pause or exit
    Resume,

    /// Inspect thread state
    GetState,

    /// Ping to check connection
    Ping,

    /// Disconnect
    Disconnect,
}

/// Response messages from the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DebugResponse {
    /// Authentication result
    Authenticated { success: bool, message: String },

    /// Source registered
    SourceLoaded { source: SourceForm },

    /// Registered sources
    SourcesList { sources: Vec<SourceForm> },

    /// Breakpoint placed; the actual line may differ from the requested one
    BreakpointSet {
        actor: BreakpointActor,
        #[serde(rename = "actualLocation")]
        actual_location: ActualLocation,
    },

    /// Breakpoint removed (also sent for handles that were already gone)
    BreakpointRemoved { actor: String },

    /// List of breakpoints
    BreakpointsList { breakpoints: Vec<Breakpoint> },

    /// Resume accepted; the outcome follows as an event
    Resumed,

    /// Thread state
    State {
        state: ThreadState,
        location: Option<WhereForm>,
        pause_count: u64,
    },

    /// Error response
    Error { message: String },

    /// Pong response
    Pong,

    /// Disconnected
    Disconnected,
}

/// Unsolicited notifications, written after the response that caused them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DebugEvent {
    Paused { frame: FrameForm, why: WhyForm },
    NewSource { source: SourceForm },
    Exited,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceForm {
    pub actor: SourceActor,
    pub url: String,
}

impl From<&Source> for SourceForm {
    fn from(source: &Source) -> Self {
        Self {
            actor: source.actor(),
            url: source.url().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub actor: SourceActor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualLocation {
    pub source: SourceRef,
    pub line: u32,
}

impl From<&Breakpoint> for ActualLocation {
    fn from(bp: &Breakpoint) -> Self {
        Self {
            source: SourceRef { actor: bp.source },
            line: bp.resolved_line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhereForm {
    pub actor: SourceActor,
    pub line: u32,
}

impl From<Location> for WhereForm {
    fn from(location: Location) -> Self {
        Self {
            actor: location.source,
            line: location.line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameForm {
    #[serde(rename = "where")]
    pub location: WhereForm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhyForm {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actors: Vec<BreakpointActor>,
}

impl From<&PauseEvent> for DebugEvent {
    fn from(event: &PauseEvent) -> Self {
        DebugEvent::Paused {
            frame: FrameForm {
                location: event.location.into(),
            },
            why: WhyForm {
                kind: event.reason.kind().to_string(),
                actors: event.reason.actors().to_vec(),
            },
        }
    }
}

impl From<&ThreadEvent> for DebugEvent {
    fn from(event: &ThreadEvent) -> Self {
        match event {
            ThreadEvent::NewSource { actor, url } => DebugEvent::NewSource {
                source: SourceForm {
                    actor: *actor,
                    url: url.clone(),
                },
            },
            ThreadEvent::Paused(pause) => pause.into(),
            ThreadEvent::Exited => DebugEvent::Exited,
        }
    }
}

/// Message wrapper for the protocol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugMessage {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<DebugRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<DebugResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<DebugEvent>,
}

impl DebugMessage {
    pub fn request(id: u64, request: DebugRequest) -> Self {
        Self {
            id,
            request: Some(request),
            response: None,
            event: None,
        }
    }

    pub fn response(id: u64, response: DebugResponse) -> Self {
        Self {
            id,
            request: None,
            response: Some(response),
            event: None,
        }
    }

    /// Events reuse the id of the request that triggered them.
    pub fn event(id: u64, event: DebugEvent) -> Self {
        Self {
            id,
            request: None,
            response: None,
            event: Some(event),
        }
    }
}

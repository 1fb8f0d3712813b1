use crate::logging;
use crate::source::{Source, SourceActor};
use crate::{DebugResult, DebuggerError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

const BREAKPOINT_PREFIX: &str = "breakpoint";

/// Unique handle of a placed breakpoint, rendered as `breakpoint{N}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BreakpointActor(u64);

impl BreakpointActor {
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BreakpointActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", BREAKPOINT_PREFIX, self.0)
    }
}

impl FromStr for BreakpointActor {
    type Err = DebuggerError;

    fn from_str(s: &str) -> DebugResult<Self> {
        s.strip_prefix(BREAKPOINT_PREFIX)
            .and_then(|id| id.parse().ok())
            .map(Self)
            .ok_or_else(|| DebuggerError::Protocol(format!("Malformed breakpoint actor: {}", s)))
    }
}

impl TryFrom<String> for BreakpointActor {
    type Error = DebuggerError;

    fn try_from(s: String) -> DebugResult<Self> {
        s.parse()
    }
}

impl From<BreakpointActor> for String {
    fn from(actor: BreakpointActor) -> Self {
        actor.to_string()
    }
}

/// Lifecycle of a breakpoint. `Removed` is terminal and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BreakpointState {
    Pending,
    Hit,
    Removed,
}

/// A placed breakpoint. The resolved line never changes after placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    pub actor: BreakpointActor,
    pub source: SourceActor,
    pub requested_line: u32,
    pub resolved_line: u32,
    pub state: BreakpointState,
    pub hit_count: u64,
}

impl Breakpoint {
    /// Whether the resolver moved the breakpoint off the requested line.
    pub fn was_moved(&self) -> bool {
        self.requested_line != self.resolved_line
    }
}

/// Breakpoint tables for every source of a session.
///
/// Each source keeps its live breakpoints keyed by resolved line, so a hit
/// check during execution is a single map lookup.
#[derive(Debug, Default)]
pub struct BreakpointManager {
    breakpoints: HashMap<BreakpointActor, Breakpoint>,
    by_location: HashMap<SourceActor, BTreeMap<u32, Vec<BreakpointActor>>>,
    next_id: u64,
}

impl BreakpointManager {
    /// Create a new breakpoint manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `requested_line` against the source's line table and register
    /// a breakpoint at the resulting location.
    pub fn place(&mut self, source: &Source, requested_line: u32) -> DebugResult<Breakpoint> {
        let resolved_line = source
            .line_table()
            .resolve(requested_line)
            .ok_or_else(|| DebuggerError::NoCodeFound {
                actor: source.actor().to_string(),
                line: requested_line,
            })?;

        self.next_id += 1;
        let breakpoint = Breakpoint {
            actor: BreakpointActor(self.next_id),
            source: source.actor(),
            requested_line,
            resolved_line,
            state: BreakpointState::Pending,
            hit_count: 0,
        };

        self.by_location
            .entry(breakpoint.source)
            .or_default()
            .entry(resolved_line)
            .or_default()
            .push(breakpoint.actor);
        self.breakpoints.insert(breakpoint.actor, breakpoint.clone());

        logging::log_breakpoint_set(
            &breakpoint.actor.to_string(),
            &breakpoint.source.to_string(),
            requested_line,
            resolved_line,
        );
        Ok(breakpoint)
    }

    /// Remove a breakpoint. Unknown or already removed handles are a no-op;
    /// the return value reports whether anything was removed.
    pub fn remove(&mut self, actor: BreakpointActor) -> bool {
        let Some(breakpoint) = self.breakpoints.remove(&actor) else {
            return false;
        };

        if let Some(lines) = self.by_location.get_mut(&breakpoint.source) {
            if let Some(actors) = lines.get_mut(&breakpoint.resolved_line) {
                actors.retain(|a| *a != actor);
                if actors.is_empty() {
                    lines.remove(&breakpoint.resolved_line);
                }
            }
            if lines.is_empty() {
                self.by_location.remove(&breakpoint.source);
            }
        }

        logging::log_breakpoint_cleared(&actor.to_string());
        true
    }

    /// Drop every breakpoint of a source being torn down.
    pub fn remove_source(&mut self, source: SourceActor) -> usize {
        let Some(lines) = self.by_location.remove(&source) else {
            return 0;
        };

        let mut removed = 0;
        for actor in lines.into_values().flatten() {
            if self.breakpoints.remove(&actor).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Live breakpoints at a resolved location, in placement order.
    pub fn breakpoints_at(&self, source: SourceActor, line: u32) -> Vec<BreakpointActor> {
        self.by_location
            .get(&source)
            .and_then(|lines| lines.get(&line))
            .cloned()
            .unwrap_or_default()
    }

    /// Check if execution should break at this location
    pub fn should_break(&self, source: SourceActor, line: u32) -> bool {
        self.by_location
            .get(&source)
            .is_some_and(|lines| lines.contains_key(&line))
    }

    /// Mark a breakpoint as hit. Returns false for removed handles.
    pub fn record_hit(&mut self, actor: BreakpointActor) -> bool {
        match self.breakpoints.get_mut(&actor) {
            Some(breakpoint) => {
                breakpoint.state = BreakpointState::Hit;
                breakpoint.hit_count += 1;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, actor: BreakpointActor) -> Option<&Breakpoint> {
        self.breakpoints.get(&actor)
    }

    /// State of a handle; handles this manager no longer holds are `Removed`.
    pub fn state(&self, actor: BreakpointActor) -> BreakpointState {
        self.breakpoints
            .get(&actor)
            .map(|bp| bp.state)
            .unwrap_or(BreakpointState::Removed)
    }

    /// List all breakpoints ordered by handle
    pub fn list(&self) -> Vec<Breakpoint> {
        let mut list: Vec<Breakpoint> = self.breakpoints.values().cloned().collect();
        list.sort_by_key(|bp| bp.actor);
        list
    }

    /// Clear all breakpoints
    pub fn clear(&mut self) {
        self.breakpoints.clear();
        self.by_location.clear();
    }

    /// Check if there are any breakpoints set
    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }

    /// Get count of breakpoints
    pub fn count(&self) -> usize {
        self.breakpoints.len()
    }
}

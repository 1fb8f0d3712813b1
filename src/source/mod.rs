pub mod classify;
pub mod line_table;

pub use line_table::LineTable;

use crate::{DebugResult, DebuggerError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

const SOURCE_PREFIX: &str = "source";

/// Stable handle of a registered source, rendered as `source{N}` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceActor(u64);

impl SourceActor {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SourceActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", SOURCE_PREFIX, self.0)
    }
}

impl FromStr for SourceActor {
    type Err = DebuggerError;

    fn from_str(s: &str) -> DebugResult<Self> {
        s.strip_prefix(SOURCE_PREFIX)
            .and_then(|id| id.parse().ok())
            .map(Self)
            .ok_or_else(|| DebuggerError::UnknownSource(s.to_string()))
    }
}

impl TryFrom<String> for SourceActor {
    type Error = DebuggerError;

    fn try_from(s: String) -> DebugResult<Self> {
        s.parse()
    }
}

impl From<SourceActor> for String {
    fn from(actor: SourceActor) -> Self {
        actor.to_string()
    }
}

/// A unit of code the debugger can place breakpoints in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    actor: SourceActor,
    url: String,
    lines: LineTable,
}

impl Source {
    pub fn actor(&self) -> SourceActor {
        self.actor
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn line_table(&self) -> &LineTable {
        &self.lines
    }
}

/// Sources known to one debugging session, in registration order.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    sources: BTreeMap<SourceActor, Source>,
    next_id: u64,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source and allocate its handle. Handles are never reused.
    pub fn register(&mut self, url: impl Into<String>, lines: LineTable) -> SourceActor {
        self.next_id += 1;
        let actor = SourceActor(self.next_id);
        self.sources.insert(
            actor,
            Source {
                actor,
                url: url.into(),
                lines,
            },
        );
        actor
    }

    pub fn get(&self, actor: SourceActor) -> DebugResult<&Source> {
        self.sources
            .get(&actor)
            .ok_or_else(|| DebuggerError::UnknownSource(actor.to_string()))
    }

    /// Look a source up by its wire form, failing fast on malformed handles.
    pub fn resolve_actor(&self, actor: &str) -> DebugResult<&Source> {
        self.get(actor.parse()?)
    }

    pub fn remove(&mut self, actor: SourceActor) -> DebugResult<Source> {
        self.sources
            .remove(&actor)
            .ok_or_else(|| DebuggerError::UnknownSource(actor.to_string()))
    }

    pub fn list(&self) -> impl Iterator<Item = &Source> {
        self.sources.values()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_allocates_distinct_handles() {
        let mut registry = SourceRegistry::new();
        let a = registry.register("a.js", LineTable::default());
        let b = registry.register("b.js", LineTable::default());
        assert_ne!(a, b);
        assert_eq!(registry.get(b).unwrap().url(), "b.js");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_handles_are_not_reused_after_removal() {
        let mut registry = SourceRegistry::new();
        let a = registry.register("a.js", LineTable::default());
        registry.remove(a).unwrap();
        let b = registry.register("a.js", LineTable::default());
        assert_ne!(a, b);
        assert!(matches!(
            registry.get(a),
            Err(DebuggerError::UnknownSource(_))
        ));
    }

    #[test]
    fn test_actor_wire_form() {
        let actor: SourceActor = "source12".parse().unwrap();
        assert_eq!(actor.id(), 12);
        assert_eq!(actor.to_string(), "source12");
        assert_eq!(serde_json::to_string(&actor).unwrap(), "\"source12\"");
    }

    #[test]
    fn test_malformed_actor_fails_fast() {
        let registry = SourceRegistry::new();
        for bad in ["", "source", "sourcex", "breakpoint1", "source-1"] {
            assert_eq!(
                registry.resolve_actor(bad).unwrap_err(),
                DebuggerError::UnknownSource(bad.to_string())
            );
        }
    }
}

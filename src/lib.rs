pub mod cli;
pub mod client;
pub mod config;
pub mod debugger;
pub mod logging;
pub mod server;
pub mod source;
pub mod ui;
use miette::Diagnostic;

pub use debugger::engine::DebuggerEngine;
pub use source::{LineTable, Source, SourceActor, SourceRegistry};

/// Result type alias for the debugger front ends
pub type Result<T> = miette::Result<T>;

/// Result type for core operations that callers match on
pub type DebugResult<T> = std::result::Result<T, DebuggerError>;

/// Error types for the debugger
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum DebuggerError {
    #[error("No code found at or after line {line} in {actor}")]
    #[diagnostic(
        code(debugger::no_code_found),
        help("The requested line is past the last executable line of the source. Use `line-debug lines` to list executable lines.")
    )]
    NoCodeFound { actor: String, line: u32 },

    #[error("Unknown source: {0}")]
    #[diagnostic(
        code(debugger::unknown_source),
        help("Source handles look like `source1`. Use `ListSources` to see the registered sources.")
    )]
    UnknownSource(String),

    #[error("Invalid line table: {0}")]
    #[diagnostic(
        code(debugger::invalid_line_table),
        help("Executable lines are 1-based and must be strictly increasing.")
    )]
    InvalidLineTable(String),

    #[error("Invalid debugger state: {0}")]
    #[diagnostic(code(debugger::invalid_state))]
    InvalidState(String),

    #[error("Protocol error: {0}")]
    #[diagnostic(
        code(debugger::protocol_error),
        help("Each message is one JSON object per line. See the protocol module for the packet shapes.")
    )]
    Protocol(String),

    #[error("File operation failed: {0}")]
    #[diagnostic(
        code(debugger::file_error),
        help("Check if you have necessary permissions and that the path exists.")
    )]
    FileError(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(debugger::config_error),
        help("Check the syntax of .line-debug.toml.")
    )]
    ConfigError(String),
}

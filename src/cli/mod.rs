pub mod args;
pub mod commands;

pub use args::{
    Cli, Commands, CompletionsArgs, LinesArgs, OutputFormat, RemoteArgs, ResolveArgs, RunArgs,
    ServerArgs, Verbosity,
};

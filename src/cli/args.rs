use crate::config::{Config, DEFAULT_PORT};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "line-debug")]
#[command(about = "A line-oriented source debugger with breakpoint resolution", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose (debug-level) logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the executable lines of a source file
    Lines(LinesArgs),

    /// Resolve requested lines to the lines breakpoints would land on
    Resolve(ResolveArgs),

    /// Run a source file under the debugger, reporting every pause
    Run(RunArgs),

    /// Start a remote debug server
    Server(ServerArgs),

    /// Debug a source file on a remote debug server
    Remote(RemoteArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn from_config(value: Option<&str>) -> Option<Self> {
        match value? {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

#[derive(Parser)]
pub struct LinesArgs {
    /// Path to the source file
    #[arg(short, long)]
    pub source: PathBuf,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Parser)]
pub struct ResolveArgs {
    /// Path to the source file
    #[arg(short, long)]
    pub source: PathBuf,

    /// Requested line (repeatable)
    #[arg(short, long, required = true)]
    pub line: Vec<u32>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the source file
    #[arg(short, long)]
    pub source: PathBuf,

    /// Set breakpoint at line (repeatable)
    #[arg(short, long)]
    pub breakpoint: Vec<u32>,

    /// Execution order as comma separated lines (default: every executable line once)
    #[arg(long, value_delimiter = ',')]
    pub trace: Vec<u32>,

    /// Do not pause on `debugger` statements
    #[arg(long)]
    pub ignore_debugger: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl RunArgs {
    /// Fill unset options from the configuration file
    pub fn merge_config(&mut self, config: &Config) {
        if self.breakpoint.is_empty() {
            self.breakpoint = config.debug.breakpoints.clone();
        }
        if config.debug.stop_on_debugger == Some(false) {
            self.ignore_debugger = true;
        }
        if self.format.is_none() {
            self.format = OutputFormat::from_config(config.output.format.as_deref());
        }
    }
}

impl LinesArgs {
    pub fn merge_config(&mut self, config: &Config) {
        if self.format.is_none() {
            self.format = OutputFormat::from_config(config.output.format.as_deref());
        }
    }
}

impl ResolveArgs {
    pub fn merge_config(&mut self, config: &Config) {
        if self.format.is_none() {
            self.format = OutputFormat::from_config(config.output.format.as_deref());
        }
    }
}

#[derive(Parser)]
pub struct ServerArgs {
    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Token clients must authenticate with
    #[arg(long, env = "LINE_DEBUG_TOKEN")]
    pub token: Option<String>,

    /// Do not pause on `debugger` statements
    #[arg(long)]
    pub ignore_debugger: bool,
}

impl ServerArgs {
    pub fn merge_config(&mut self, config: &Config) {
        if self.port.is_none() {
            self.port = config.server.port;
        }
        if self.token.is_none() {
            self.token = config.server.token.clone();
        }
        if config.debug.stop_on_debugger == Some(false) {
            self.ignore_debugger = true;
        }
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

#[derive(Parser)]
pub struct RemoteArgs {
    /// Server address (host:port)
    #[arg(short, long)]
    pub remote: String,

    /// Authentication token
    #[arg(long, env = "LINE_DEBUG_TOKEN")]
    pub token: Option<String>,

    /// Path to the source file to load on the server
    #[arg(short, long)]
    pub source: PathBuf,

    /// Set breakpoint at line (repeatable)
    #[arg(short, long)]
    pub breakpoint: Vec<u32>,
}

impl RemoteArgs {
    pub fn merge_config(&mut self, config: &Config) {
        if self.breakpoint.is_empty() {
            self.breakpoint = config.debug.breakpoints.clone();
        }
        if self.token.is_none() {
            self.token = config.server.token.clone();
        }
    }
}

#[derive(Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Log verbosity selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn to_log_level(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "debug",
        }
    }
}

use crate::cli::args::{LinesArgs, OutputFormat, RemoteArgs, ResolveArgs, RunArgs, ServerArgs};
use crate::client::RemoteClient;
use crate::debugger::{BreakpointActor, DebuggerEngine, ExecutionTrace, RunOutcome, ThreadEvent};
use crate::logging;
use crate::server::protocol::{DebugEvent, WhereForm};
use crate::server::DebugServer;
use crate::source::{classify, LineTable};
use crate::ui::formatter::Formatter;
use crate::{DebuggerError, Result};
use miette::{IntoDiagnostic, WrapErr};
use serde_json::json;
use std::fs;
use std::path::Path;

fn print_info(message: impl AsRef<str>) {
    println!("{}", Formatter::info(message));
}

fn print_success(message: impl AsRef<str>) {
    println!("{}", Formatter::success(message));
}

fn print_warning(message: impl AsRef<str>) {
    println!("{}", Formatter::warning(message));
}

fn read_source(path: &Path) -> Result<String> {
    logging::log_loading_source(&path.to_string_lossy());
    fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read source file: {:?}", path))
}

fn source_url(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    let text = serde_json::to_string(value)
        .map_err(|e| DebuggerError::Protocol(format!("Failed to serialize output: {}", e)))?;
    println!("{}", text);
    Ok(())
}

/// Execute the lines command
pub fn lines(args: LinesArgs) -> Result<()> {
    let text = read_source(&args.source)?;
    let table = LineTable::from_source_text(&text);

    match args.format.unwrap_or(OutputFormat::Text) {
        OutputFormat::Json => print_json(&json!({
            "source": source_url(&args.source),
            "lines": table.lines(),
        })),
        OutputFormat::Text => {
            let mut engine = DebuggerEngine::new();
            let actor = engine.add_source(&source_url(&args.source), table);
            let source = engine.source(actor)?;
            println!("{}", Formatter::format_line_table(source, &[]));
            Ok(())
        }
    }
}

/// Execute the resolve command
pub fn resolve(args: ResolveArgs) -> Result<()> {
    let text = read_source(&args.source)?;
    let mut engine = DebuggerEngine::new();
    let actor = engine.add_source(&source_url(&args.source), LineTable::from_source_text(&text));
    let format = args.format.unwrap_or(OutputFormat::Text);

    let mut first_error = None;
    for &line in &args.line {
        match engine.set_breakpoint(actor, line) {
            Ok(bp) => match format {
                OutputFormat::Json => print_json(&json!({
                    "requested": line,
                    "actualLocation": { "source": { "actor": actor }, "line": bp.resolved_line },
                }))?,
                OutputFormat::Text if bp.was_moved() => print_success(format!(
                    "line {} -> {} (next executable line)",
                    line, bp.resolved_line
                )),
                OutputFormat::Text => print_success(format!("line {} -> {}", line, line)),
            },
            Err(e) => {
                match format {
                    OutputFormat::Json => print_json(&json!({
                        "requested": line,
                        "error": e.to_string(),
                    }))?,
                    OutputFormat::Text => print_warning(format!("line {}: {}", line, e)),
                }
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// Execute the run command
pub fn run(args: RunArgs) -> Result<()> {
    let text = read_source(&args.source)?;
    let format = args.format.unwrap_or(OutputFormat::Text);
    let url = source_url(&args.source);

    let mut engine = DebuggerEngine::new();
    engine.set_pause_on_debugger(!args.ignore_debugger);
    let events = engine.take_events()?;

    let actor = if args.trace.is_empty() {
        engine.load_script(&url, &text)
    } else {
        let actor = engine.add_source(&url, LineTable::from_source_text(&text));
        let debugger_lines = classify::debugger_statement_lines(&text);
        engine.set_debuggee(Box::new(ExecutionTrace::from_lines(
            actor,
            &args.trace,
            &debugger_lines,
        )))?;
        actor
    };

    if format == OutputFormat::Text {
        print_info(format!("Loaded {} as {}", url, actor));
    }

    for &line in &args.breakpoint {
        match engine.set_breakpoint(actor, line) {
            Ok(bp) if format == OutputFormat::Text => {
                print_info(format!("Breakpoint {}", Formatter::format_breakpoint(&bp)))
            }
            Ok(_) => {}
            Err(e) => return Err(e.into()),
        }
    }

    let marks: Vec<u32> = engine
        .breakpoints()
        .list()
        .iter()
        .map(|bp| bp.resolved_line)
        .collect();
    logging::log_display(
        Formatter::format_line_table(engine.source(actor)?, &marks),
        logging::LogLevel::Debug,
    );

    loop {
        let outcome = engine.resume()?;
        for event in events.try_iter() {
            report_event(&event, &text, format)?;
        }
        if outcome == RunOutcome::Exited {
            break;
        }
    }

    if format == OutputFormat::Text {
        print_success(format!(
            "Execution finished ({} pause(s))",
            engine.pause_count()
        ));
    }
    Ok(())
}

fn report_event(event: &ThreadEvent, text: &str, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&DebugEvent::from(event)),
        OutputFormat::Text => {
            if let ThreadEvent::Paused(pause) = event {
                let line = text.lines().nth(pause.location.line.saturating_sub(1) as usize);
                println!("{}", Formatter::format_pause(pause, line));
            }
            Ok(())
        }
    }
}

/// Execute the server command
pub fn server(args: ServerArgs) -> Result<()> {
    print_info(format!("Starting debug server on port {}", args.port()));
    DebugServer::new(args.port(), args.token.clone())
        .with_pause_on_debugger(!args.ignore_debugger)
        .start()
}

/// Execute the remote command
pub fn remote(args: RemoteArgs) -> Result<()> {
    let text = read_source(&args.source)?;
    let mut client = RemoteClient::connect(&args.remote, args.token.clone())?;

    let source = client.load_source(&source_url(&args.source), &text)?;
    let actor = source.actor.to_string();
    print_info(format!("Loaded {} as {}", source.url, actor));

    for &line in &args.breakpoint {
        let (bp, location) = client.set_breakpoint(&actor, line)?;
        print_info(format!("Breakpoint {} at {}:{}", bp, actor, location.line));
    }

    loop {
        match client.resume()? {
            DebugEvent::Paused { frame, why } => {
                let WhereForm { actor, line } = frame.location;
                print_info(format!(
                    "Paused at {}:{} ({}{})",
                    actor,
                    line,
                    why.kind,
                    format_actors(&why.actors)
                ));
            }
            _ => break,
        }
    }

    client.disconnect()?;
    print_success("Remote execution finished");
    Ok(())
}

fn format_actors(actors: &[BreakpointActor]) -> String {
    if actors.is_empty() {
        return String::new();
    }
    let names: Vec<String> = actors.iter().map(ToString::to_string).collect();
    format!(" {}", names.join(", "))
}

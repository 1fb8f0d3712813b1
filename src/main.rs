use clap::{CommandFactory, Parser};
use clap_complete::generate;
use line_debugger::cli::{Cli, Commands, Verbosity};
use line_debugger::ui::formatter::Formatter;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn initialize_tracing(verbosity: Verbosity) {
    let log_level = verbosity.to_log_level();
    let fallback_filter = format!("line_debugger={}", log_level);

    let use_json = std::env::var("LINE_DEBUG_JSON").is_ok();

    if use_json {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| fallback_filter.clone().into()),
            )
            .with(json_layer)
            .init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| fallback_filter.into()),
            )
            .with(fmt_layer)
            .init();
    }
}

fn main() -> miette::Result<()> {
    Formatter::configure_colors_from_env();

    let cli = Cli::parse();
    let verbosity = cli.verbosity();

    initialize_tracing(verbosity);

    let config = line_debugger::config::Config::load_or_default();

    let result = match cli.command {
        Commands::Lines(mut args) => {
            args.merge_config(&config);
            line_debugger::cli::commands::lines(args)
        }
        Commands::Resolve(mut args) => {
            args.merge_config(&config);
            line_debugger::cli::commands::resolve(args)
        }
        Commands::Run(mut args) => {
            args.merge_config(&config);
            line_debugger::cli::commands::run(args)
        }
        Commands::Server(mut args) => {
            args.merge_config(&config);
            line_debugger::cli::commands::server(args)
        }
        Commands::Remote(mut args) => {
            args.merge_config(&config);
            line_debugger::cli::commands::remote(args)
        }
        Commands::Completions(args) => {
            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "line-debug", &mut io::stdout());
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("{}", Formatter::error(format!("Error: {err}")));
        return Err(err);
    }
    Ok(())
}

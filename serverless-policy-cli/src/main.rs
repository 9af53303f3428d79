use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use serverless_policy_synthesis::{policy_file_name, Synthesizer};

mod answers;
mod cli;
mod error;
mod output;
mod prompt;
mod settings;

use answers::Answers;
use cli::Args;
use error::{exit_code_for, UsageError};
use prompt::{Prompter, TerminalPrompter};
use settings::resolve_settings;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

/// `RUST_LOG` takes precedence over `-v` when set
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let answers = match &args.answers {
        Some(path) => {
            Answers::load_from_path(path).map_err(|err| UsageError::new(format!("{err:#}")))?
        }
        None => Answers::default(),
    };

    let interactive = !args.no_input && atty::is(atty::Stream::Stdin);
    let mut terminal = TerminalPrompter;
    let prompter: Option<&mut dyn Prompter> = if interactive {
        Some(&mut terminal)
    } else {
        None
    };

    let settings = resolve_settings(args, answers, prompter, current_dir_name())?;
    settings.log_summary();

    let synthesizer = Synthesizer::with_conventions(settings.conventions.clone());
    let policy = if args.strict {
        synthesizer
            .try_synthesize(&settings.identity, &settings.toggles)
            .map_err(|err| UsageError::new(err.to_string()))?
    } else {
        synthesizer.synthesize(&settings.identity, &settings.toggles)
    };
    let document = policy
        .to_json_pretty()
        .context("Failed to render policy document")?;

    if args.stdout {
        println!("{document}");
        return Ok(());
    }

    let file_name = policy_file_name(&settings.identity);
    eprintln!("Writing to {file_name}");
    let path = output::write_policy(&args.output_dir, &file_name, &document, args.force)?;
    info!(
        "Wrote {} statements to {}",
        policy.statement.len(),
        path.display()
    );
    Ok(())
}

fn current_dir_name() -> Option<String> {
    std::env::current_dir()
        .ok()?
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

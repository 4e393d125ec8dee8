use std::{
    backtrace::Backtrace,
    panic::{self, AssertUnwindSafe},
    path::PathBuf,
    process,
    sync::Mutex,
};

use clap::Parser;
use env_logger::Env;
use log::{debug, info};

use implang::{
    diagnostics::diagnostics::{DiagnosticReporter, TerminalReporter},
    driver::{check_file, CompileOptions},
};

/// Backtrace frames kept in a crash report.
const BACKTRACE_FRAMES: usize = 16;

static LAST_BACKTRACE: Mutex<Option<String>> = Mutex::new(None);

/// ImpLang front end: checks source files for lexical, syntax and semantic
/// errors
#[derive(Parser, Debug)]
#[command(name = "impc")]
#[command(version)]
struct Cli {
    /// Source files, checked one after another
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Log definitions and forward references
    #[arg(short, long)]
    verbose: bool,

    /// Print the token stream of each file
    #[arg(long)]
    dump_tokens: bool,

    /// Print the syntax tree of each file that checks
    #[arg(long)]
    dump_ast: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl From<&Cli> for CompileOptions {
    fn from(cli: &Cli) -> Self {
        CompileOptions {
            dump_tokens: cli.dump_tokens,
            dump_ast: cli.dump_ast,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    if cli.no_color {
        yansi::disable();
    }

    panic::set_hook(Box::new(|_| {
        if let Ok(mut slot) = LAST_BACKTRACE.lock() {
            *slot = Some(Backtrace::force_capture().to_string());
        }
    }));

    let options = CompileOptions::from(&cli);
    let mut reporter = TerminalReporter::new(!cli.no_color);
    let mut failed = false;

    for file in &cli.files {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            check_file(file, &options, &mut reporter)
        }));

        match outcome {
            Ok(Ok(_)) => info!("{}: ok", file.display()),
            Ok(Err(failure)) => {
                debug!("{}", failure);
                failed = true;
            }
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|message| message.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| String::from("unknown panic"));

                reporter.report_crash(
                    &format!("panicked while checking '{}': {}", file.display(), message),
                    &take_backtrace(),
                );
                failed = true;
            }
        }
    }

    if failed {
        process::exit(1);
    }
}

/// The last captured backtrace, reduced to the frames inside this crate.
fn take_backtrace() -> Vec<String> {
    let Some(backtrace) = LAST_BACKTRACE.lock().ok().and_then(|mut slot| slot.take()) else {
        return vec![];
    };

    backtrace
        .lines()
        .filter(|line| line.contains("implang") || line.contains("impc"))
        .take(BACKTRACE_FRAMES)
        .map(str::to_string)
        .collect()
}

mod commands;
mod core;
mod golist;
mod graph;

use clap::Parser;
use crate::commands::{OutputFormat, Outcome};
use crate::core::error::{AffectedError, ExitCode, print_error};
use crate::graph::AffectedQuery;
use tracing_subscriber::EnvFilter;

/// List the packages of the current Go module that depend on another module
#[derive(Parser)]
#[command(name = "affectedpkgs")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Module path to look for (e.g. github.com/sirupsen/logrus)
  module: String,

  /// Only print root packages (not imported by another affected package)
  #[arg(long)]
  roots: bool,

  /// Include the test imports of the module's own packages
  #[arg(long)]
  test: bool,

  /// Output a JSON array instead of one import path per line
  #[arg(long)]
  json: bool,
}

fn get_styles() -> clap::builder::Styles {
  use anstyle::{AnsiColor, Color, Style};

  let fg = |color: AnsiColor| Style::new().fg_color(Some(Color::Ansi(color)));
  let heading = fg(AnsiColor::Yellow).bold().underline();

  clap::builder::Styles::styled()
    .usage(heading)
    .header(heading)
    .literal(fg(AnsiColor::Green))
    .invalid(fg(AnsiColor::Red).bold())
    .error(fg(AnsiColor::Red).bold())
    .valid(fg(AnsiColor::Green).bold().underline())
    .placeholder(fg(AnsiColor::White))
}

/// Logs go to stderr; stdout carries only the package list.
/// Controlled via RUST_LOG, e.g. RUST_LOG=affectedpkgs=debug
fn init_tracing() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(std::io::stderr)
    .with_target(false)
    .without_time()
    .init();
}

fn main() {
  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(err) => {
      // --help and --version are "errors" that print to stdout and succeed
      let code = if err.use_stderr() { ExitCode::Usage.as_i32() } else { 0 };
      // Nothing sensible to do if the usage text cannot be printed
      let _ = err.print();
      std::process::exit(code);
    }
  };

  init_tracing();

  let dir = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => handle_error(AffectedError::message(format!("Failed to get current directory: {}", e))),
  };

  let query = AffectedQuery {
    target_module: cli.module,
    include_tests: cli.test,
    roots_only: cli.roots,
  };
  let format = if cli.json { OutputFormat::Json } else { OutputFormat::Text };

  match commands::run_affected(&dir, query, format) {
    Ok(Outcome::Affected) => {}
    Ok(Outcome::NothingAffected) => std::process::exit(ExitCode::Failure.as_i32()),
    Err(err) => handle_error(err),
  }
}

fn handle_error(err: AffectedError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}

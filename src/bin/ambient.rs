#![allow(clippy::print_stderr)]

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;

use ambient::cli::args::CliArgs;
use ambient::cli::{driver, reporter::Reporter};
use ambient::embedded_libs::get_all_libs;

fn main() -> Result<()> {
    // Initialize tracing if AMBIENT_LOG or RUST_LOG is set.
    // Supports AMBIENT_LOG_FORMAT=tree|json|text (see src/tracing_config.rs).
    ambient::tracing_config::init_tracing();

    let args = CliArgs::parse();

    if args.list_libs {
        for lib in get_all_libs() {
            println!("{} ({})", lib.name, lib.file_name);
        }
        return Ok(());
    }

    let result = driver::run(&args)?;
    if !result.output.is_empty() {
        print!("{}", result.output);
    }

    let color = args.pretty.unwrap_or_else(|| std::io::stderr().is_terminal());
    let reporter = Reporter::new(color);
    let diagnostics = result.table.diagnostics();
    if !diagnostics.is_empty() {
        eprintln!("{}", reporter.render(diagnostics));
    }
    if let Some(summary) = reporter.summary(diagnostics) {
        eprintln!("\n{summary}");
    }

    std::process::exit(result.exit_code());
}

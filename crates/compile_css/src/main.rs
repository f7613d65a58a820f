use crate::cli::Cli;
use anyhow::Error;
use clap::Parser as _;
use css::{CompileOptions, CompileStats, compile};
use env_logger::{Builder, Env};
use log::{error, info, warn};
use std::panic::catch_unwind;
use std::process::{ExitCode, exit};

mod cli;
mod files;

pub fn main() -> ExitCode {
    Builder::from_env(Env::default().filter_or("RUST_LOG", "info"))
        .format_timestamp(None)
        .init();

    if let Err(err) = install_interrupt_handler() {
        warn!("Ctrl-C handler not installed: {err}");
    }

    let cli = Cli::parse();
    match catch_unwind(|| run(&cli)) {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(err)) => {
            error!("{err:?}");
            ExitCode::FAILURE
        }
        Err(_) => {
            error!("Compilation aborted by an internal error");
            ExitCode::FAILURE
        }
    }
}

/// Exit with status 1 on Ctrl-C. The output is only ever replaced by an
/// atomic rename, so an interrupted run leaves it untouched.
fn install_interrupt_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        error!("Compilation interrupted");
        exit(1);
    })
}

fn run(cli: &Cli) -> Result<(), Error> {
    info!("Reading {}", cli.input.display());
    let source = files::read_stylesheet(&cli.input)?;

    let options = CompileOptions {
        alphabetical: cli.alphabetical,
        safe_mode: !cli.unsafe_sort,
    };
    let compilation = compile(&source, &options);

    info!("Writing {}", cli.output.display());
    if let Some(backup) = files::write_with_backup(&cli.output, &compilation.css)? {
        info!("Previous output kept as {}", backup.display());
    }
    report(&compilation.stats);
    Ok(())
}

fn report(stats: &CompileStats) {
    info!("Input size: {} bytes", stats.input_bytes);
    info!("Final size: {} bytes", stats.output_bytes);
    info!("Reduction: {} bytes", stats.size_reduction());
    info!("Rules parsed: {}", stats.rules_parsed);
    info!("Selectors split: {}", stats.selectors_split);
    info!("Properties merged: {}", stats.properties_merged);
    info!("At-rules preserved: {}", stats.at_rules);
    info!("Media queries: {}", stats.media_queries);
    if stats.parse_errors > 0 {
        warn!("Parse errors: {}", stats.parse_errors);
    }
    if stats.dropped_at_rules > 0 {
        warn!("At-rules dropped from @media blocks: {}", stats.dropped_at_rules);
    }
}

#[cfg(test)]
mod tests {
    use super::install_interrupt_handler;
    use ctrlc::Error;

    #[test]
    fn interrupt_handler_installs_once() {
        install_interrupt_handler().unwrap();
        assert!(matches!(
            install_interrupt_handler(),
            Err(Error::MultipleHandlers)
        ));
    }
}

//! Application entry point and dispatch.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::warn;

use algorace_cli::chart::write_chart;
use algorace_cli::output::{format_number, write_json};
use algorace_cli::presenter::CLIResultPresenter;
use algorace_cli::prompt::read_size;
use algorace_cli::terminal::TerminalSink;
use algorace_cli::ui::{print_header, print_success, print_warning};
use algorace_core::constants::exit_codes;
use algorace_core::dataset::Dataset;
use algorace_core::progress::CancellationToken;
use algorace_core::registry::DefaultFactory;
use algorace_orchestration::coordinator::RaceCoordinator;
use algorace_orchestration::interfaces::{FrameSink, NullSink, ResultPresenter};
use algorace_orchestration::workload_selection::get_workloads_to_run;

use crate::config::AppConfig;
use crate::errors::report_exit_code;

/// Run the application and return the process exit code.
pub fn run(config: &AppConfig) -> Result<i32> {
    // Handle shell completion
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        algorace_cli::completion::generate_completion(&mut cmd, shell, &mut io::stdout());
        return Ok(exit_codes::SUCCESS);
    }

    let size = resolve_size(config)?;
    let dataset = Dataset::generate(size, config.range, config.seed)?;

    let factory = DefaultFactory::new();
    let workloads = get_workloads_to_run(&config.algo, &factory)?;
    let mut coordinator = RaceCoordinator::new(config.race_config());
    coordinator.register_workers(workloads)?;

    let cancel = CancellationToken::new();
    let interrupted = Arc::new(AtomicBool::new(false));
    ctrlc_handler(cancel.clone(), Arc::clone(&interrupted));

    print_header(&format!(
        "Racing {} algorithms over {} elements (target {}, seed {})",
        coordinator.names().len(),
        format_number(dataset.len() as u64),
        dataset.target(),
        dataset
            .seed()
            .map_or_else(|| "-".to_string(), |s| s.to_string())
    ));

    let report = coordinator.run(&dataset, live_view(config), &cancel)?;

    let presenter = CLIResultPresenter::new();
    presenter.present_rankings(&report);
    presenter.present_winner(&report);

    if let Err(err) = report.validate() {
        print_warning(&err.to_string());
    }

    if !config.no_chart {
        match write_chart(&config.chart, &report.chart_rows()) {
            Ok(()) => print_success(&format!("Chart written to {}", config.chart.display())),
            Err(err) => presenter.present_error(&format!(
                "could not write chart {}: {err}",
                config.chart.display()
            )),
        }
    }

    if let Some(path) = &config.json {
        write_json(path, &report)
            .with_context(|| format!("failed to write JSON report to {}", path.display()))?;
    }

    Ok(report_exit_code(
        &report,
        interrupted.load(Ordering::SeqCst),
    ))
}

/// Size from the flag, or from an interactive prompt.
fn resolve_size(config: &AppConfig) -> Result<usize> {
    if let Some(size) = config.size {
        return Ok(size);
    }
    let answer = read_size(&mut io::stdin().lock(), &mut io::stdout())
        .context("failed to read the array size")?;
    if answer.defaulted {
        print_warning(&format!(
            "invalid size, using the default of {}",
            format_number(answer.size as u64)
        ));
    }
    Ok(answer.size)
}

/// Live view sink: the terminal when interactive and not quiet, otherwise nothing.
fn live_view(config: &AppConfig) -> Box<dyn FrameSink> {
    if config.quiet {
        return Box::new(NullSink);
    }
    let sink = TerminalSink::stdout();
    if sink.is_interactive() {
        Box::new(sink)
    } else {
        Box::new(NullSink)
    }
}

fn ctrlc_handler(cancel: CancellationToken, interrupted: Arc<AtomicBool>) {
    let installed = ctrlc::set_handler(move || {
        interrupted.store(true, Ordering::SeqCst);
        cancel.cancel();
    });
    if let Err(err) = installed {
        warn!(error = %err, "could not install the Ctrl+C handler");
    }
}

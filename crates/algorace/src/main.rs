//! AlgoRace: race search and sort algorithms with a live progress view.

use algorace_lib::{app, config, errors};

fn main() {
    // Logs go to stderr so they never tear the live view on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = config::AppConfig::parse();
    let code = match app::run(&config) {
        Ok(code) => code,
        Err(err) => {
            algorace_cli::ui::print_error(&format!("{err:#}"));
            errors::exit_code(&err)
        }
    };
    std::process::exit(code);
}

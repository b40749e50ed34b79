use clap::Parser;

mod app;
mod args;
mod config;
mod demos;
mod logging;
mod window;

use app::{App, AppError};
use args::Args;
use config::{Config, ConfigError};
use demos::DemoKind;

fn main() {
    // clion needs help in trait annotation
    let args = <Args as Parser>::parse();

    if let Err(e) = run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), RunError> {
    let config = args.config.as_deref().map(Config::load).transpose();

    // log before anything can fail, even when the config file is broken
    let file_filter = match &config {
        Ok(Some(c)) => c.log_filter.clone(),
        _ => None,
    };
    let cli_filter = args.log.as_deref().filter(|f| !f.trim().is_empty());
    logging::init_logging(cli_filter.or(file_filter.as_deref()));

    let mut config = config?.unwrap_or_default();
    config.apply_args(&args);
    config.validate()?;

    let kind = DemoKind::from(args.demo);
    log::info!("starting demo {kind:?}");

    let app = App::new(&config.window, kind.create())?;

    app.run()
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("could not start demo: {0}")]
    App(#[from] AppError),
}

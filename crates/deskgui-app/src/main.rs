mod cli;
mod session;

use std::sync::Arc;

use deskgui_common::{DeskError, Result};
use deskgui_config::DeskguiConfig;
use deskgui_core::{App, WebviewOptions};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let thread = std::thread::current();
        eprintln!(
            "\n--- deskgui panicked on thread '{}' ---",
            thread.name().unwrap_or("<unnamed>")
        );
        default_hook(info);
    }));
}

fn init_logging(directive: &str) {
    let filter = EnvFilter::from_default_env();
    let filter = match directive.parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(e) => {
            eprintln!("invalid log directive '{directive}' ({e}), falling back to info");
            filter.add_directive(LevelFilter::INFO.into())
        }
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Build the app, hand the window to a worker and run the loop until the
/// worker closes it.
fn launch(config: DeskguiConfig, worker_calls: u32) -> Result<session::SessionReport> {
    let app = App::with_config(config);
    let window = app.create_window("main")?;
    let webview = window.create_webview("content", WebviewOptions::from(&app.config().webview))?;
    session::install_listeners(&window, &webview)?;
    window.center()?;
    window.show()?;

    let worker = session::spawn_worker(Arc::clone(&app), window, webview, worker_calls)?;

    tracing::info!("Entering main loop");
    app.run();

    worker
        .join()
        .map_err(|_| DeskError::Other("worker thread panicked".into()))?
}

fn main() {
    install_panic_hook();

    let args = cli::parse();

    let loaded = match &args.config {
        Some(path) => deskgui_config::load_config_from(path),
        None => deskgui_config::load_config(),
    };

    let directive = args.log_level.clone().unwrap_or_else(|| match &loaded {
        Ok(config) => config.logging.level.directive(),
        Err(_) => "deskgui=info".into(),
    });
    init_logging(&directive);

    tracing::info!("deskgui v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    let mut config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        DeskguiConfig::default()
    });
    if let Some(title) = args.title {
        config.window.title = title;
    }
    tracing::info!("Config loaded (app: {})", config.app.name);

    match launch(config, args.worker_calls) {
        Ok(report) => tracing::info!(?report, "Shutdown complete"),
        Err(e) => {
            tracing::error!("deskgui failed: {e}");
            std::process::exit(1);
        }
    }
}

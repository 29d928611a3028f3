use anyhow::Result;
use std::thread;
use std::time::Duration;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};

use crate::lsp::backend::Backend;
use crate::Config;

/// Start the LSP server
pub async fn serve() -> Result<()> {
    let config = Config::from_args_and_env()?;

    // Logs go to stderr; stdout carries the protocol
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    match &config.config_path {
        Some(path) => log::info!("Using configuration file {}", path.display()),
        None => log::info!("No configuration file found, using defaults"),
    }

    // If running under the integration test, exit after a short delay so the test can read stdout to EOF.
    if std::env::var("AAM_LS_TEST_EXIT").as_deref() == Ok("1") {
        thread::spawn(|| {
            thread::sleep(Duration::from_secs(1));
            std::process::exit(0);
        });
    }

    let (service, socket) =
        LspService::build(move |client| Backend::new(client, config.clone())).finish();

    Server::new(stdin(), stdout(), socket).serve(service).await;

    Ok(())
}

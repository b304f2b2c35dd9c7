mod config;
mod event;
mod images;
mod logging;
mod plain;
mod ui;

use std::sync::Arc;

use amphibians_core::{AmphibianClient, Controller, Transport, UreqTransport};
use tokio::sync::mpsc::unbounded_channel;
use tracing::info;

use crate::config::Config;
use crate::images::ImageLoader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init(&config)?;
    info!(url = %config.url, timeout = ?config.timeout, plain = config.plain, "starting");

    let transport: Arc<dyn Transport> = Arc::new(UreqTransport::new(config.timeout));
    let controller = Controller::new(AmphibianClient::new(&config.url), Arc::clone(&transport));

    if config.plain {
        return plain::run(&controller, transport).await;
    }

    let (tx, rx) = unbounded_channel();
    event::spawn_input(tx.clone());

    // dropping the UI returns the terminal to normal mode
    let ui = ui::Ui::new(ImageLoader::new(transport, tx))?;
    controller.start();
    ui.run(&controller, rx).await?;

    // image probes may still be blocking on the network; don't wait for them
    std::process::exit(0);
}

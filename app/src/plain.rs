//! Non-interactive output: fetch once, print the cards, exit.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;

use amphibians_core::{present, probe_image, Controller, ImageStatus, Screen, Transport};
use anyhow::bail;
use futures::future::join_all;

pub async fn run(controller: &Controller, transport: Arc<dyn Transport>) -> anyhow::Result<()> {
    controller.start().await?;
    let state = controller.current_state();

    let probes = state.records().unwrap_or_default().iter().map(|record| {
        let transport = Arc::clone(&transport);
        let url = record.image_url.clone();
        tokio::task::spawn_blocking(move || {
            let status = probe_image(transport.as_ref(), &url);
            (url, status)
        })
    });
    let images: HashMap<String, ImageStatus> = join_all(probes)
        .await
        .into_iter()
        .filter_map(Result::ok)
        .collect();

    let screen = present(&state, |url| {
        images.get(url).copied().unwrap_or(ImageStatus::Failed)
    });
    write_screen(&mut io::stdout().lock(), &screen)?;

    if let Screen::Failed { message, .. } = screen {
        bail!("{message}");
    }
    Ok(())
}

pub fn write_screen(out: &mut impl Write, screen: &Screen) -> io::Result<()> {
    match screen {
        Screen::Loading => writeln!(out, "{}", amphibians_core::present::LOADING_TEXT),
        Screen::Cards(cards) => {
            for card in cards {
                writeln!(out, "{}", card.title)?;
                writeln!(out, "  {} {}", card.image, card.image_url)?;
                writeln!(out)?;
            }
            Ok(())
        }
        Screen::Failed { message, action } => {
            writeln!(out, "{message}")?;
            writeln!(out, "({action} by running again)")
        }
    }
}

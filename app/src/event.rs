use std::io;

use amphibians_core::ImageStatus;
use termion::{event::Key, input::TermRead};
use tokio::sync::mpsc::UnboundedSender;

/// Everything the UI loop reacts to besides view state changes.
#[derive(Debug)]
pub enum Event {
    Key(Key),
    Image { url: String, status: ImageStatus },
}

/// Forward key presses from stdin on a dedicated thread. Stdin reads block,
/// so this must not run on the async runtime.
pub fn spawn_input(tx: UnboundedSender<Event>) {
    std::thread::spawn(move || {
        for key in io::stdin().keys().flatten() {
            if tx.send(Event::Key(key)).is_err() {
                return;
            }
        }
    });
}

use std::io::{self, Stdout};

use amphibians_core::present::LOADING_TEXT;
use amphibians_core::{present, Card, Controller, ImageStatus, Screen, ViewState};
use futures::future::{select, Either};
use termion::{
    event::Key,
    raw::{IntoRawMode, RawTerminal},
    screen::AlternateScreen,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;
use tui::{
    backend::{Backend, TermionBackend},
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::event::Event;
use crate::images::ImageLoader;

/// Each card is a title, an image line, a URL line and a spacer.
const LINES_PER_CARD: u16 = 4;
const PAGE: u16 = 10;

type Term = Terminal<TermionBackend<AlternateScreen<RawTerminal<Stdout>>>>;

pub struct Ui {
    /// terminal abstraction, restored to normal mode on drop
    terminal: Term,

    /// first visible line of the card list
    scroll: u16,

    images: ImageLoader,
}

impl Ui {
    pub fn new(images: ImageLoader) -> io::Result<Self> {
        let stdout = io::stdout().into_raw_mode()?;
        let stdout = AlternateScreen::from(stdout);
        let backend = TermionBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        terminal.clear()?;
        terminal.hide_cursor()?;

        Ok(Ui {
            terminal,
            scroll: 0,
            images,
        })
    }

    // draw based on state
    fn render(&mut self, state: &ViewState) -> io::Result<()> {
        for record in state.records().unwrap_or_default() {
            self.images.request(&record.image_url);
        }
        let images = &self.images;
        let screen = present(state, |url| images.status(url));
        let scroll = self.scroll;

        self.terminal.draw(|f| draw(f, &screen, scroll))?;
        Ok(())
    }

    /// Returns true when the user asked to quit.
    fn on_key(&mut self, key: Key, state: &ViewState, controller: &Controller) -> bool {
        let max_scroll = state
            .records()
            .map(|r| (r.len() as u16).saturating_mul(LINES_PER_CARD).saturating_sub(1))
            .unwrap_or(0);

        match key {
            Key::Char('q') | Key::Char('Q') | Key::Esc => return true,
            Key::Ctrl(c) if c.eq_ignore_ascii_case(&'c') || c.eq_ignore_ascii_case(&'d') => {
                return true
            }
            Key::Char('r') | Key::Char('R') => {
                debug!("retry requested");
                self.scroll = 0;
                controller.retry();
            }
            Key::Up | Key::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            Key::Down | Key::Char('j') => self.scroll = (self.scroll + 1).min(max_scroll),
            Key::PageUp => self.scroll = self.scroll.saturating_sub(PAGE),
            Key::PageDown => self.scroll = self.scroll.saturating_add(PAGE).min(max_scroll),
            Key::Home => self.scroll = 0,
            _ => {}
        }
        false
    }

    /// Redraws after every state change, key press or image result until
    /// the user quits.
    pub async fn run(mut self, controller: &Controller, mut events: UnboundedReceiver<Event>) -> io::Result<()> {
        let mut states = controller.subscribe();

        loop {
            let state = states.borrow_and_update().clone();
            self.render(&state)?;

            let event = Box::pin(events.recv());
            let change = Box::pin(states.changed());

            match select(event, change).await {
                Either::Left((Some(Event::Key(key)), _)) => {
                    if self.on_key(key, &state, controller) {
                        break;
                    }
                }
                Either::Left((Some(Event::Image { url, status }), _)) => {
                    self.images.resolve(url, status)
                }
                Either::Left((None, _)) => break,
                Either::Right((Ok(()), _)) => {}
                Either::Right((Err(_), _)) => break,
            }
        }

        Ok(())
    }
}

fn draw<B: Backend>(f: &mut Frame<B>, screen: &Screen, scroll: u16) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.size());

    let block = Block::default().title(" Amphibians ").borders(Borders::ALL);

    let (body, hint) = match screen {
        Screen::Loading => (
            Paragraph::new(vec![Spans::from(""), Spans::from(format!("{LOADING_TEXT}…"))])
                .alignment(Alignment::Center)
                .block(block),
            " q quit",
        ),
        Screen::Cards(cards) => (
            Paragraph::new(card_lines(cards)).block(block).scroll((scroll, 0)),
            " ↑/↓ scroll   r refresh   q quit",
        ),
        Screen::Failed { message, action } => (
            Paragraph::new(vec![
                Spans::from(""),
                Spans::from(Span::styled(*message, Style::default().fg(Color::Red))),
                Spans::from(""),
                Spans::from(Span::styled(
                    format!("[ {action} (r) ]"),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
            ])
            .alignment(Alignment::Center)
            .block(block),
            " r retry   q quit",
        ),
    };

    f.render_widget(body, chunks[0]);
    f.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
        chunks[1],
    );
}

fn card_lines(cards: &[Card]) -> Vec<Spans<'_>> {
    if cards.is_empty() {
        return vec![Spans::from(" No amphibians.")];
    }

    let mut lines = Vec::with_capacity(cards.len() * LINES_PER_CARD as usize);
    for card in cards {
        let image_style = match card.image {
            ImageStatus::Loading => Style::default().fg(Color::Yellow),
            ImageStatus::Loaded { .. } => Style::default().fg(Color::Green),
            ImageStatus::Failed => Style::default().fg(Color::Red),
        };
        lines.push(Spans::from(Span::styled(
            format!(" {}", card.title),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Spans::from(vec![
            Span::raw("   "),
            Span::styled(card.image.to_string(), image_style),
        ]));
        lines.push(Spans::from(Span::styled(
            format!("   {}", card.image_url),
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Spans::from(""));
    }
    lines
}

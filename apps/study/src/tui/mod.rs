mod card_widget;
mod category_picker;
mod key_handler;
mod markdown;
mod notes_widget;
mod palette;
mod screen;
mod sidebar_widget;
mod status_bar;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use flashcard_core::{Card, LoadError, Request, StudyController, ThemeStore};
use ratatui::prelude::*;
use reqwest::Client;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::config::Config;
use crate::source::{self, Source};
use screen::Screen;

const IDLE_POLL: Duration = Duration::from_millis(100);
const ANIMATION_POLL: Duration = Duration::from_millis(16);

/// Completion of a background fetch.
enum AppEvent {
    CardsLoaded(Result<Vec<Card>, LoadError>),
    NotesLoaded(Result<String, LoadError>),
}

/// Runs the two document fetches on the tokio runtime.
struct Loader {
    handle: Handle,
    client: Client,
    tx: UnboundedSender<AppEvent>,
}

impl Loader {
    fn fetch_cards(&self, source: Source) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let result = source::load_cards(&source, &client).await;
            let _ = tx.send(AppEvent::CardsLoaded(result));
        });
    }

    fn fetch_notes(&self, source: Source) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let result = source::load_notes(&source, &client).await;
            let _ = tx.send(AppEvent::NotesLoaded(result));
        });
    }
}

pub fn run<S: ThemeStore>(
    config: &Config,
    mut controller: StudyController<S>,
    handle: Handle,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let loader = Loader {
        handle,
        client: Client::new(),
        tx,
    };

    let mut screen = Screen::new();
    controller.render_all(&mut screen);
    loader.fetch_cards(config.cards.clone());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Event loop
    let result = run_loop(
        &mut terminal,
        &mut controller,
        &mut screen,
        &mut rx,
        &loader,
        config,
    );

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn run_loop<B: Backend, S: ThemeStore>(
    terminal: &mut Terminal<B>,
    controller: &mut StudyController<S>,
    screen: &mut Screen,
    rx: &mut UnboundedReceiver<AppEvent>,
    loader: &Loader,
    config: &Config,
) -> Result<()> {
    loop {
        while let Ok(event) = rx.try_recv() {
            match event {
                AppEvent::CardsLoaded(result) => controller.cards_loaded(result, screen),
                AppEvent::NotesLoaded(result) => controller.notes_loaded(result, screen),
            }
        }

        let animating = screen.tick();
        terminal.draw(|f| ui::draw(f, screen))?;

        if screen.quit {
            tracing::info!("Quitting");
            return Ok(());
        }

        let timeout = if animating || screen.scroll_target.is_some() {
            ANIMATION_POLL
        } else {
            IDLE_POLL
        };
        if !event::poll(timeout)? {
            continue;
        }

        let action = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                key_handler::handle_key(screen, key)
            }
            Event::Mouse(mouse) => key_handler::handle_mouse(screen, mouse),
            _ => None,
        };
        if let Some(action) = action {
            if let Some(Request::FetchNotes) = controller.dispatch(action, screen) {
                loader.fetch_notes(config.notes.clone());
            }
        }
    }
}

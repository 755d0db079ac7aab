//! Terminal chess client (default binary).
//!
//! Connects to the game server, mirrors its state and renders the board with
//! a framebuffer-based renderer. Input is keyboard (cursor plus keys) or
//! mouse clicks on squares.

use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use log::LevelFilter;
use simplelog::WriteLogger;
use tracing::info;

use tui_chess::adapter::ChessLink;
use tui_chess::input::{handle_key_event, handle_mouse_event, should_quit};
use tui_chess::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tui_chess::types::{StartColour, DEFAULT_TICK_MS};
use tui_chess::{App, ClientConfig};

#[derive(Debug, Parser)]
#[command(name = "tui-chess", version, about = "Terminal client for a remote chess server")]
struct Args {
    /// WebSocket endpoint of the game server
    #[arg(short, long)]
    url: Option<String>,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<LevelFilter>,

    /// Start a game as soon as the connection opens
    #[arg(long, value_name = "COLOUR", value_parser = parse_start_colour)]
    start: Option<StartColour>,
}

impl Args {
    fn apply(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(url) = &self.url {
            config.connection.url = url.clone();
        }
        if let Some(path) = &self.log_file {
            config.log_path = Some(path.clone());
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        config
    }
}

fn parse_start_colour(s: &str) -> Result<StartColour, String> {
    StartColour::from_str(s).ok_or_else(|| format!("expected white, black or random, got {s:?}"))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.apply(ClientConfig::from_env());
    setup_logging(&config)?;

    info!(url = %config.connection.url, "starting client");
    let mut link = ChessLink::start(config.connection.clone())?;
    let mut app = App::new().with_auto_start(args.start);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut link, &mut app);

    // Always try to restore terminal state.
    let _ = term.exit();
    link.shutdown();
    info!("client stopped");
    result
}

fn setup_logging(config: &ClientConfig) -> Result<()> {
    let Some(path) = &config.log_path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    WriteLogger::init(
        config.log_level,
        simplelog::ConfigBuilder::new()
            .set_target_level(LevelFilter::Error)
            .build(),
        file,
    )
    .context("failed to install logger")?;
    Ok(())
}

fn run(term: &mut TerminalRenderer, link: &mut ChessLink, app: &mut App) -> Result<()> {
    let view = GameView::default();
    let tick = Duration::from_millis(DEFAULT_TICK_MS);
    let mut fb = FrameBuffer::new(0, 0);

    loop {
        // Server events first so the frame shows the latest snapshot.
        while let Some(event) = link.try_recv() {
            app.handle_event(event, link);
        }

        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);
        view.render_into(&app.scene(), viewport, &mut fb);
        term.draw_swap(&mut fb)?;

        if !event::poll(tick)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if should_quit(key) {
                    return Ok(());
                }
                if let Some(action) = handle_key_event(key) {
                    app.handle_action(action, link);
                }
            }
            Event::Mouse(mouse) => {
                if let Some((x, y)) = handle_mouse_event(mouse) {
                    app.handle_click(&view, viewport, x, y, link);
                }
            }
            Event::Resize(..) => term.invalidate(),
            _ => {}
        }
    }
}

//! App: the single event-loop context of the terminal client.
//!
//! Owns the [`Session`] (mirrored state and selection), the keyboard cursor
//! and the last known link state. Connection events, key actions and mouse
//! clicks all come through here, one at a time; commands leave through
//! whatever [`CommandSink`] the caller passes in.

use tracing::{info, warn};

use crate::adapter::{ConnectionEvent, ReadyState};
use crate::core::{CommandSink, Notice, NoticeKind, Session};
use crate::input::{BoardCursor, UiAction};
use crate::term::{bottom_colour, GameView, LinkStatusView, Scene, Viewport};
use crate::types::StartColour;

#[derive(Debug)]
pub struct App {
    session: Session,
    cursor: BoardCursor,
    link_state: ReadyState,
    /// Game to request once the link opens.
    auto_start: Option<StartColour>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            session: Session::new(),
            cursor: BoardCursor::default(),
            link_state: ReadyState::Connecting,
            auto_start: None,
        }
    }

    pub fn with_auto_start(mut self, colour: Option<StartColour>) -> Self {
        self.auto_start = colour;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cursor(&self) -> BoardCursor {
        self.cursor
    }

    pub fn link_state(&self) -> ReadyState {
        self.link_state
    }

    /// Apply one event from the connection.
    pub fn handle_event(&mut self, event: ConnectionEvent, sink: &mut impl CommandSink) {
        match event {
            ConnectionEvent::Opened => {
                self.link_state = ReadyState::Open;
                if let Some(colour) = self.auto_start.take() {
                    info!(colour = colour.as_str(), "requesting game on connect");
                    self.session.start(colour, sink);
                }
            }
            ConnectionEvent::Notice(notice) => self.session.record_notice(notice),
            ConnectionEvent::Update(update) => {
                // A rejected update is already logged and surfaced by the session.
                let _ = self.session.apply_update(&update);
            }
            ConnectionEvent::Closed { reason } => {
                self.link_state = ReadyState::Closed;
                let message = match reason {
                    Some(reason) => {
                        warn!(%reason, "link lost");
                        format!("disconnected: {reason}")
                    }
                    None => "disconnected".to_string(),
                };
                self.session
                    .record_notice(Notice::new(NoticeKind::Local, message));
            }
        }
    }

    pub fn handle_action(&mut self, action: UiAction, sink: &mut impl CommandSink) {
        match action {
            UiAction::Cursor(direction) => {
                let bottom = bottom_colour(self.session.state());
                self.cursor.step(direction, bottom);
            }
            UiAction::Select => {
                self.session.tap(self.cursor.square(), sink);
            }
            UiAction::Cancel => self.session.controller_mut().reset(),
            UiAction::Resign => self.session.resign(sink),
            UiAction::Undo => self.session.undo(sink),
            UiAction::Start(colour) => self.session.start(colour, sink),
            UiAction::CyclePromotion => {
                self.session.controller_mut().cycle_promotion();
            }
        }
    }

    /// A left click at screen cell `(x, y)`; clicks off the board are ignored.
    pub fn handle_click(
        &mut self,
        view: &GameView,
        viewport: Viewport,
        x: u16,
        y: u16,
        sink: &mut impl CommandSink,
    ) {
        let bottom = bottom_colour(self.session.state());
        if let Some(sq) = view.square_at(viewport, bottom, x, y) {
            self.cursor.set(sq);
            self.session.tap(sq, sink);
        }
    }

    pub fn scene(&self) -> Scene<'_> {
        let controller = self.session.controller();
        Scene {
            state: self.session.state(),
            controller,
            cursor: Some(self.cursor.square()),
            notice: self.session.notice(),
            link: Some(LinkStatusView {
                label: self.link_state.as_str(),
                open: self.link_state == ReadyState::Open,
            }),
        }
    }
}

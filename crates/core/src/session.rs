//! Session - the event-loop context
//!
//! Owns the mirrored [`GameState`] and the [`InteractionController`] so that
//! one loop can feed server events in and user taps out without any shared
//! globals. The state is only ever swapped as a whole.

use tracing::{info, warn};

use crate::game_state::{apply_update, GameState, ServerUpdate};
use crate::interaction::{CommandSink, InteractionController};
use crate::notation::NotationError;
use crate::types::{Move, Square, StartColour};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Server rejected a command (`type: "error"`).
    Error,
    /// Server acknowledged something (`type: "okay"`).
    Okay,
    /// Client-side diagnostic, e.g. a discarded update.
    Local,
}

/// Last diagnostic line to surface to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    state: GameState,
    controller: InteractionController,
    notice: Option<Notice>,
    updates_applied: u64,
    updates_rejected: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut InteractionController {
        &mut self.controller
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn updates_applied(&self) -> u64 {
        self.updates_applied
    }

    pub fn updates_rejected(&self) -> u64 {
        self.updates_rejected
    }

    /// Apply an authoritative update.
    ///
    /// On success the state is replaced and the selection reset. On failure
    /// the previous state stays in place untouched.
    pub fn apply_update(&mut self, update: &ServerUpdate) -> Result<(), NotationError> {
        match apply_update(&self.state, update) {
            Ok(next) => {
                self.state = next;
                self.controller.reset();
                self.updates_applied += 1;
                Ok(())
            }
            Err(err) => {
                warn!(%err, position = %update.position, "discarding malformed update");
                self.updates_rejected += 1;
                self.notice = Some(Notice::new(
                    NoticeKind::Local,
                    format!("ignored bad update: {err}"),
                ));
                Err(err)
            }
        }
    }

    /// Record a server `error`/`okay` message. Game state is unaffected.
    pub fn record_notice(&mut self, notice: Notice) {
        match notice.kind {
            NoticeKind::Error => warn!(message = %notice.message, "server error"),
            _ => info!(message = %notice.message, "server notice"),
        }
        self.notice = Some(notice);
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn tap(&mut self, sq: Square, sink: &mut impl CommandSink) -> Option<Move> {
        self.controller.tap(&self.state, sq, sink)
    }

    pub fn resign(&mut self, sink: &mut impl CommandSink) {
        self.controller.resign(sink);
    }

    pub fn undo(&mut self, sink: &mut impl CommandSink) {
        self.controller.undo(sink);
    }

    pub fn start(&mut self, colour: StartColour, sink: &mut impl CommandSink) {
        self.controller.start(colour, sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::{Command, Selection};
    use crate::types::Colour;

    fn update(position: &str) -> ServerUpdate {
        ServerUpdate {
            message: "Played Move.".into(),
            position: position.into(),
            moves: vec!["e2e4".into()],
            player_colour: Some(Colour::White),
            player_turn: true,
            game_over: false,
            ..Default::default()
        }
    }

    #[test]
    fn update_resets_armed_selection() {
        let mut session = Session::new();
        session
            .apply_update(&update("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"))
            .unwrap();
        let mut sent: Vec<Command> = Vec::new();
        session.tap(Square::parse("a2").unwrap(), &mut sent);
        assert!(matches!(session.controller().selection(), Selection::Armed(_)));

        session
            .apply_update(&update("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"))
            .unwrap();
        assert_eq!(session.controller().selection(), Selection::Idle);
        assert!(sent.is_empty());
        assert_eq!(session.updates_applied(), 2);
    }

    #[test]
    fn failed_update_keeps_previous_state() {
        let mut session = Session::new();
        session
            .apply_update(&update("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"))
            .unwrap();
        let before = session.state().clone();

        assert!(session.apply_update(&update("rnbqkbnr/ppp")).is_err());
        assert_eq!(session.state(), &before);
        assert_eq!(session.updates_rejected(), 1);
        assert_eq!(session.notice().map(|n| n.kind), Some(NoticeKind::Local));
    }

    #[test]
    fn notices_do_not_touch_state() {
        let mut session = Session::new();
        let before = session.state().clone();
        session.record_notice(Notice::new(NoticeKind::Error, "Not your turn."));
        assert_eq!(session.state(), &before);
        assert_eq!(session.notice().unwrap().message, "Not your turn.");
        session.clear_notice();
        assert!(session.notice().is_none());
    }
}

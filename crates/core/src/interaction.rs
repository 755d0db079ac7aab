//! Interaction controller - square taps to move commands
//!
//! Selection is a two-state machine:
//!
//! ```text
//! Idle  --tap sq (local turn)-------------> Armed(sq)
//! Armed --tap same sq---------------------> Idle
//! Armed --tap other, move legal-----------> Idle + makemove
//! Armed --tap other, move not legal-------> Idle
//! any   --authoritative update------------> Idle
//! ```
//!
//! Taps are ignored entirely while it is not the local player's turn or the
//! game is over. Commands leave through a [`CommandSink`]; the controller
//! never waits for (or predicts) the server's answer.

use tracing::debug;

use crate::game_state::GameState;
use crate::notation::encode_move;
use crate::types::{Move, Promotion, Square, StartColour};

/// Outgoing command for the game server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Encoded move text: square pair plus promotion letter, e.g. `e2e4Q`.
    MakeMove(String),
    Resign,
    Undo,
    Start(StartColour),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::MakeMove(_) => "makemove",
            Command::Resign => "resign",
            Command::Undo => "undo",
            Command::Start(_) => "start",
        }
    }
}

/// Destination for outgoing commands (fire-and-forget).
pub trait CommandSink {
    fn dispatch(&mut self, command: Command);
}

impl CommandSink for Vec<Command> {
    fn dispatch(&mut self, command: Command) {
        self.push(command);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Armed(Square),
}

impl Selection {
    pub fn square(&self) -> Option<Square> {
        match self {
            Selection::Idle => None,
            Selection::Armed(sq) => Some(*sq),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    selection: Selection,
    promotion: Promotion,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn promotion(&self) -> Promotion {
        self.promotion
    }

    pub fn set_promotion(&mut self, promotion: Promotion) {
        self.promotion = promotion;
    }

    pub fn cycle_promotion(&mut self) -> Promotion {
        self.promotion = self.promotion.cycle();
        self.promotion
    }

    /// Handle a tap on `sq`. Returns the move dispatched, if any.
    pub fn tap(&mut self, state: &GameState, sq: Square, sink: &mut impl CommandSink) -> Option<Move> {
        if !state.accepts_input() {
            return None;
        }

        match self.selection {
            Selection::Idle => {
                self.selection = Selection::Armed(sq);
                None
            }
            Selection::Armed(from) if from == sq => {
                self.selection = Selection::Idle;
                None
            }
            Selection::Armed(from) => {
                self.selection = Selection::Idle;
                let mv = Move::new(from, sq);
                if state.can_make_move(mv) {
                    let text = encode_move(mv, self.promotion);
                    debug!(%mv, text = %text, "dispatching move");
                    sink.dispatch(Command::MakeMove(text));
                    Some(mv)
                } else {
                    debug!(%mv, "illegal destination, selection cancelled");
                    None
                }
            }
        }
    }

    /// Drop the selection; called whenever a new authoritative state arrives.
    pub fn reset(&mut self) {
        self.selection = Selection::Idle;
    }

    pub fn resign(&mut self, sink: &mut impl CommandSink) {
        self.reset();
        sink.dispatch(Command::Resign);
    }

    pub fn undo(&mut self, sink: &mut impl CommandSink) {
        self.reset();
        sink.dispatch(Command::Undo);
    }

    pub fn start(&mut self, colour: StartColour, sink: &mut impl CommandSink) {
        self.reset();
        sink.dispatch(Command::Start(colour));
    }

    /// Legal destinations from the armed square, for highlighting.
    pub fn highlighted_targets<'a>(&self, state: &'a GameState) -> impl Iterator<Item = Square> + 'a {
        let from = self.selection.square();
        from.into_iter()
            .flat_map(move |from| state.legal_moves().targets_from(from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::{apply_update, ServerUpdate};
    use crate::types::Colour;

    fn sq(s: &str) -> Square {
        Square::parse(s).unwrap()
    }

    fn state(turn: bool, over: bool) -> GameState {
        let update = ServerUpdate {
            position: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR".into(),
            moves: vec!["e2e4".into(), "e2e3".into(), "g1f3".into()],
            player_colour: Some(Colour::White),
            player_turn: turn,
            game_over: over,
            ..Default::default()
        };
        apply_update(&GameState::new(), &update).unwrap()
    }

    #[test]
    fn legal_second_tap_dispatches_and_resets() {
        let s = state(true, false);
        let mut ctl = InteractionController::new();
        let mut sent = Vec::new();

        assert_eq!(ctl.tap(&s, sq("e2"), &mut sent), None);
        assert_eq!(ctl.selection(), Selection::Armed(sq("e2")));

        let mv = ctl.tap(&s, sq("e4"), &mut sent);
        assert_eq!(mv, Some(Move::new(sq("e2"), sq("e4"))));
        assert_eq!(ctl.selection(), Selection::Idle);
        assert_eq!(sent, vec![Command::MakeMove("e2e4Q".to_string())]);
    }

    #[test]
    fn tapping_armed_square_deselects() {
        let s = state(true, false);
        let mut ctl = InteractionController::new();
        let mut sent = Vec::new();
        ctl.tap(&s, sq("g1"), &mut sent);
        ctl.tap(&s, sq("g1"), &mut sent);
        assert_eq!(ctl.selection(), Selection::Idle);
        assert!(sent.is_empty());
    }

    #[test]
    fn illegal_destination_cancels_without_rearming() {
        let s = state(true, false);
        let mut ctl = InteractionController::new();
        let mut sent = Vec::new();
        ctl.tap(&s, sq("e2"), &mut sent);
        ctl.tap(&s, sq("g1"), &mut sent);
        assert_eq!(ctl.selection(), Selection::Idle);
        assert!(sent.is_empty());
    }

    #[test]
    fn taps_are_ignored_outside_local_turn() {
        let mut sent = Vec::new();
        for s in [state(false, false), state(true, true), GameState::new()] {
            let mut ctl = InteractionController::new();
            ctl.tap(&s, sq("e2"), &mut sent);
            assert_eq!(ctl.selection(), Selection::Idle);
        }
        assert!(sent.is_empty());
    }

    #[test]
    fn promotion_choice_is_appended() {
        let s = state(true, false);
        let mut ctl = InteractionController::new();
        ctl.set_promotion(Promotion::Knight);
        let mut sent = Vec::new();
        ctl.tap(&s, sq("e2"), &mut sent);
        ctl.tap(&s, sq("e3"), &mut sent);
        assert_eq!(sent, vec![Command::MakeMove("e2e3N".to_string())]);
    }

    #[test]
    fn game_commands_deselect() {
        let s = state(true, false);
        let mut ctl = InteractionController::new();
        let mut sent = Vec::new();
        ctl.tap(&s, sq("e2"), &mut sent);
        ctl.resign(&mut sent);
        assert_eq!(ctl.selection(), Selection::Idle);

        ctl.undo(&mut sent);
        ctl.start(StartColour::Random, &mut sent);
        assert_eq!(
            sent,
            vec![
                Command::Resign,
                Command::Undo,
                Command::Start(StartColour::Random)
            ]
        );
    }

    #[test]
    fn highlights_follow_armed_square() {
        let s = state(true, false);
        let mut ctl = InteractionController::new();
        assert_eq!(ctl.highlighted_targets(&s).count(), 0);
        ctl.tap(&s, sq("e2"), &mut Vec::new());
        let mut targets: Vec<String> = ctl.highlighted_targets(&s).map(|t| t.to_string()).collect();
        targets.sort();
        assert_eq!(targets, vec!["e3", "e4"]);

        ctl.reset();
        ctl.tap(&s, sq("a2"), &mut Vec::new());
        assert_eq!(ctl.highlighted_targets(&s).count(), 0);
    }
}

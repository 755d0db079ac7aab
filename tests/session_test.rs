use tui_chess::core::{apply_update, Command, GameState, Selection, ServerUpdate, Session};
use tui_chess::types::{Colour, Move, Promotion, Square, StartColour};

const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn sq(s: &str) -> Square {
    Square::parse(s).unwrap()
}

fn white_to_move() -> ServerUpdate {
    ServerUpdate {
        message: "Started Game.".into(),
        position: START.into(),
        moves: ["a2a3", "a2a4", "e2e3", "e2e4", "g1f3", "g1h3"]
            .into_iter()
            .map(String::from)
            .collect(),
        player_colour: Some(Colour::White),
        player_turn: true,
        game_over: false,
        last_move: None,
        wins: 0,
        losses: 0,
        draws: 0,
    }
}

#[test]
fn legal_second_tap_sends_move_with_promotion_letter() {
    let mut session = Session::new();
    session.apply_update(&white_to_move()).unwrap();

    let mut sent = Vec::new();
    session.tap(sq("e2"), &mut sent);
    assert_eq!(session.controller().selection(), Selection::Armed(sq("e2")));
    session.tap(sq("e4"), &mut sent);

    assert_eq!(sent, vec![Command::MakeMove("e2e4Q".into())]);
    assert_eq!(session.controller().selection(), Selection::Idle);
    // The board is not touched until the server answers.
    assert!(session.state().board().piece_at(sq("e2")).is_some());
    assert!(session.state().board().piece_at(sq("e4")).is_none());
}

#[test]
fn update_while_armed_resets_selection() {
    let mut session = Session::new();
    session.apply_update(&white_to_move()).unwrap();
    let mut sent = Vec::new();
    session.tap(sq("g1"), &mut sent);
    assert!(matches!(session.controller().selection(), Selection::Armed(_)));

    let mut waiting = white_to_move();
    waiting.player_turn = false;
    session.apply_update(&waiting).unwrap();
    assert_eq!(session.controller().selection(), Selection::Idle);
    assert!(sent.is_empty());
}

#[test]
fn same_update_twice_gives_same_state() {
    let update = white_to_move();
    let a = apply_update(&GameState::new(), &update).unwrap();
    let b = apply_update(&a, &update).unwrap();
    assert_eq!(a, b);

    let mut session = Session::new();
    session.apply_update(&update).unwrap();
    let first = session.state().clone();
    session.apply_update(&update).unwrap();
    assert_eq!(session.state(), &first);
}

#[test]
fn taps_outside_local_turn_never_arm() {
    let mut waiting = white_to_move();
    waiting.player_turn = false;
    let mut over = white_to_move();
    over.game_over = true;

    for update in [waiting, over] {
        let mut session = Session::new();
        session.apply_update(&update).unwrap();
        assert!(session.state().legal_moves().is_empty());
        let mut sent = Vec::new();
        for i in 0..64 {
            session.tap(Square::from_index(i).unwrap(), &mut sent);
            assert_eq!(session.controller().selection(), Selection::Idle);
        }
        assert!(sent.is_empty());
    }
}

#[test]
fn can_make_move_is_set_membership() {
    let state = apply_update(&GameState::new(), &white_to_move()).unwrap();
    let listed: Vec<Move> = state.legal_moves().iter().copied().collect();
    for from in 0..64 {
        for to in 0..64 {
            let mv = Move::new(Square::from_index(from).unwrap(), Square::from_index(to).unwrap());
            assert_eq!(state.can_make_move(mv), listed.contains(&mv), "{mv}");
        }
    }
}

#[test]
fn illegal_destination_cancels_selection() {
    let mut session = Session::new();
    session.apply_update(&white_to_move()).unwrap();
    let mut sent = Vec::new();
    session.tap(sq("e2"), &mut sent);
    session.tap(sq("g1"), &mut sent);
    assert_eq!(session.controller().selection(), Selection::Idle);
    assert!(sent.is_empty());
}

#[test]
fn malformed_update_keeps_previous_state() {
    let mut session = Session::new();
    session.apply_update(&white_to_move()).unwrap();
    let before = session.state().clone();

    let mut bad = white_to_move();
    bad.position = "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR".into();
    assert!(session.apply_update(&bad).is_err());

    let mut bad = white_to_move();
    bad.moves.push("e2".into());
    assert!(session.apply_update(&bad).is_err());

    assert_eq!(session.state(), &before);
    assert_eq!(session.updates_rejected(), 2);
}

#[test]
fn commands_and_promotion_choice() {
    let mut session = Session::new();
    session.apply_update(&white_to_move()).unwrap();
    session.controller_mut().set_promotion(Promotion::Rook);

    let mut sent = Vec::new();
    session.tap(sq("a2"), &mut sent);
    session.tap(sq("a4"), &mut sent);
    session.undo(&mut sent);
    session.resign(&mut sent);
    session.start(StartColour::White, &mut sent);

    assert_eq!(
        sent,
        vec![
            Command::MakeMove("a2a4R".into()),
            Command::Undo,
            Command::Resign,
            Command::Start(StartColour::White),
        ]
    );
}

use std::future::Future;
use std::time::{Duration, Instant};

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};

use tui_chess::adapter::protocol::{ClientMessage, EmptyArg, MakeMoveArg, StartArg, StartColourLower};
use tui_chess::adapter::{ChessLink, Connection, ConnectionConfig, ConnectionEvent, ReadyState};
use tui_chess::core::{Command, NoticeKind, Session};
use tui_chess::types::{Square, StartColour};

const STEP: Duration = Duration::from_secs(5);

fn update_json(player_turn: bool) -> String {
    serde_json::json!({
        "type": "update",
        "message": "Started Game.",
        "player_colour": "white",
        "position": "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "player_turn": player_turn,
        "gameover": false,
        "moves": ["e2e4", "e2e3", "g1f3"],
        "last_move": "a1a1",
        "wins": 0,
        "losses": 0,
        "draws": 1
    })
    .to_string()
}

/// Accept one WebSocket client on a fresh port and hand it to `handler`.
async fn serve_once<F, Fut>(handler: F) -> (String, JoinHandle<()>)
where
    F: FnOnce(WebSocketStream<TcpStream>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = accept_async(stream).await.unwrap();
        handler(ws).await;
    });
    (format!("ws://{addr}/socket/"), handle)
}

async fn next_event(events: &mut tokio::sync::mpsc::Receiver<ConnectionEvent>) -> ConnectionEvent {
    tokio::time::timeout(STEP, events.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

async fn next_command(ws: &mut WebSocketStream<TcpStream>) -> Option<ClientMessage> {
    while let Some(frame) = ws.next().await {
        match frame {
            Ok(Message::Text(text)) => return Some(serde_json::from_str(&text).unwrap()),
            Ok(Message::Close(_)) | Err(_) => return None,
            Ok(_) => {}
        }
    }
    None
}

#[tokio::test]
async fn commands_out_and_events_in_order() {
    let (seen_tx, seen_rx) = oneshot::channel();
    let (url, server) = serve_once(|mut ws| async move {
        let first = next_command(&mut ws).await;
        ws.send(Message::Text(r#"{"type":"welcome"}"#.into())).await.unwrap();
        ws.send(Message::Text("not json".into())).await.unwrap();
        ws.send(Message::Text(update_json(true))).await.unwrap();
        ws.send(Message::Text(
            r#"{"type":"error","message":"Cannot undo."}"#.into(),
        ))
        .await
        .unwrap();
        let second = next_command(&mut ws).await;
        let _ = seen_tx.send((first, second));
        // Wait for the client to close.
        while next_command(&mut ws).await.is_some() {}
    })
    .await;

    let (mut conn, mut events) = Connection::open(ConnectionConfig::default().with_url(url));
    assert_eq!(next_event(&mut events).await, ConnectionEvent::Opened);
    assert_eq!(conn.ready_state(), ReadyState::Open);

    assert!(conn.send(&Command::Start(StartColour::White)));

    let mut session = Session::new();
    match next_event(&mut events).await {
        ConnectionEvent::Update(update) => {
            assert_eq!(update.draws, 1);
            session.apply_update(&update).unwrap();
        }
        other => panic!("Expected Update, got {other:?}"),
    }
    assert!(session.state().accepts_input());

    match next_event(&mut events).await {
        ConnectionEvent::Notice(notice) => {
            assert_eq!(notice.kind, NoticeKind::Error);
            assert_eq!(notice.message, "Cannot undo.");
            session.record_notice(notice);
        }
        other => panic!("Expected Notice, got {other:?}"),
    }

    session.tap(Square::parse("e2").unwrap(), &mut conn);
    session.tap(Square::parse("e4").unwrap(), &mut conn);

    let (first, second) = tokio::time::timeout(STEP, seen_rx).await.unwrap().unwrap();
    assert_eq!(
        first,
        Some(ClientMessage::Start(StartArg {
            colour: StartColourLower::White
        }))
    );
    assert_eq!(
        second,
        Some(ClientMessage::MakeMove(MakeMoveArg {
            mv: "e2e4Q".into()
        }))
    );

    conn.close();
    conn.close();
    assert!(!conn.send(&Command::Resign));
    assert_eq!(
        next_event(&mut events).await,
        ConnectionEvent::Closed { reason: None }
    );
    assert_eq!(conn.ready_state(), ReadyState::Closed);
    conn.shutdown().await;
    let _ = tokio::time::timeout(STEP, server).await;
}

#[tokio::test]
async fn server_close_ends_the_stream() {
    let (acked_tx, acked_rx) = oneshot::channel();
    let (url, server) = serve_once(|mut ws| async move {
        ws.send(Message::Text(update_json(false))).await.unwrap();
        ws.close(None).await.unwrap();
        let mut acked = false;
        while let Some(frame) = ws.next().await {
            if matches!(frame, Ok(Message::Close(_))) {
                acked = true;
            }
        }
        let _ = acked_tx.send(acked);
    })
    .await;

    let (conn, mut events) = Connection::open(ConnectionConfig::default().with_url(url));
    assert_eq!(next_event(&mut events).await, ConnectionEvent::Opened);
    assert!(matches!(
        next_event(&mut events).await,
        ConnectionEvent::Update(u) if !u.player_turn
    ));
    assert!(matches!(
        next_event(&mut events).await,
        ConnectionEvent::Closed { .. }
    ));
    assert_eq!(conn.ready_state(), ReadyState::Closed);
    assert!(!conn.send(&Command::Undo));
    // Nothing after Closed; no reconnection.
    assert!(tokio::time::timeout(STEP, events.recv()).await.unwrap().is_none());
    conn.shutdown().await;
    // The client answered the server's close frame.
    assert!(tokio::time::timeout(STEP, acked_rx).await.unwrap().unwrap());
    let _ = server.await;
}

#[tokio::test]
async fn refused_connection_reports_reason() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = ConnectionConfig::default().with_url(format!("ws://127.0.0.1:{port}/socket/"));
    let (conn, mut events) = Connection::open(config);
    match next_event(&mut events).await {
        ConnectionEvent::Closed { reason } => assert!(reason.is_some()),
        other => panic!("Expected Closed, got {other:?}"),
    }
    assert_eq!(conn.ready_state(), ReadyState::Closed);
    conn.shutdown().await;
}

#[tokio::test]
async fn sends_before_open_are_dropped() {
    let (release_tx, release_rx) = oneshot::channel::<()>();
    let (seen_tx, seen_rx) = oneshot::channel();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/socket/", listener.local_addr().unwrap());
    let server = tokio::spawn(async move {
        // Hold the handshake until the client has tried to send.
        let _ = release_rx.await;
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        let _ = seen_tx.send(next_command(&mut ws).await);
        while next_command(&mut ws).await.is_some() {}
    });

    let (mut conn, mut events) = Connection::open(ConnectionConfig::default().with_url(url));
    assert_eq!(conn.ready_state(), ReadyState::Connecting);
    assert!(!conn.send(&Command::Resign));
    release_tx.send(()).unwrap();

    assert_eq!(next_event(&mut events).await, ConnectionEvent::Opened);
    assert!(conn.send(&Command::Undo));
    let seen = tokio::time::timeout(STEP, seen_rx).await.unwrap().unwrap();
    assert_eq!(seen, Some(ClientMessage::Undo(EmptyArg {})));

    conn.close();
    assert!(matches!(
        next_event(&mut events).await,
        ConnectionEvent::Closed { .. }
    ));
    conn.shutdown().await;
    let _ = tokio::time::timeout(STEP, server).await;
}

#[test]
fn chess_link_bridges_a_sync_loop() {
    let server_rt = tokio::runtime::Runtime::new().unwrap();
    let listener = server_rt
        .block_on(TcpListener::bind("127.0.0.1:0"))
        .unwrap();
    let url = format!("ws://{}/socket/", listener.local_addr().unwrap());
    let (seen_tx, seen_rx) = std::sync::mpsc::channel::<ClientMessage>();
    server_rt.spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        ws.send(Message::Text(update_json(true))).await.unwrap();
        while let Some(msg) = next_command(&mut ws).await {
            let _ = seen_tx.send(msg);
        }
    });

    let mut link = ChessLink::start(ConnectionConfig::default().with_url(url)).unwrap();
    let mut session = Session::new();
    let deadline = Instant::now() + STEP;
    while session.updates_applied() == 0 {
        assert!(Instant::now() < deadline, "no update received");
        match link.try_recv() {
            Some(ConnectionEvent::Update(update)) => session.apply_update(&update).unwrap(),
            Some(_) => {}
            None => std::thread::sleep(Duration::from_millis(10)),
        }
    }
    assert_eq!(link.ready_state(), ReadyState::Open);

    session.tap(Square::parse("g1").unwrap(), &mut link);
    session.tap(Square::parse("f3").unwrap(), &mut link);
    let seen = seen_rx.recv_timeout(STEP).unwrap();
    assert_eq!(
        seen,
        ClientMessage::MakeMove(MakeMoveArg {
            mv: "g1f3Q".into()
        })
    );

    link.close();
    link.close();
    link.shutdown();
}

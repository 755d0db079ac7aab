//! Protocol module - JSON message types for the game server socket
//!
//! Outbound messages are `{"cmd": <name>, "arg": {...}}`. Inbound messages
//! are discriminated by `type` into `error`, `okay` and `update`. Inbound
//! payloads are validated into [`ServerMessage`] at the boundary; anything
//! that does not fit is reported as a [`ProtocolError`] and never partially
//! used.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Command, Notice, NoticeKind, ServerUpdate};
use crate::types::{Colour, StartColour};

// ============== Client -> Server Messages ==============

/// Command envelope sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "arg")]
pub enum ClientMessage {
    #[serde(rename = "makemove")]
    MakeMove(MakeMoveArg),
    #[serde(rename = "resign")]
    Resign(EmptyArg),
    #[serde(rename = "undo")]
    Undo(EmptyArg),
    #[serde(rename = "start")]
    Start(StartArg),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeMoveArg {
    #[serde(rename = "move")]
    pub mv: String,
}

/// Serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyArg {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartArg {
    pub colour: StartColourLower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StartColourLower {
    #[serde(rename = "white")]
    White,
    #[serde(rename = "black")]
    Black,
    #[serde(rename = "random")]
    Random,
}

impl From<StartColour> for StartColourLower {
    fn from(value: StartColour) -> Self {
        match value {
            StartColour::White => Self::White,
            StartColour::Black => Self::Black,
            StartColour::Random => Self::Random,
        }
    }
}

impl From<&Command> for ClientMessage {
    fn from(value: &Command) -> Self {
        match value {
            Command::MakeMove(text) => ClientMessage::MakeMove(MakeMoveArg { mv: text.clone() }),
            Command::Resign => ClientMessage::Resign(EmptyArg {}),
            Command::Undo => ClientMessage::Undo(EmptyArg {}),
            Command::Start(colour) => ClientMessage::Start(StartArg {
                colour: (*colour).into(),
            }),
        }
    }
}

// ============== Server -> Client Messages ==============

/// Inbound message, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "error")]
    Error(NoticeMessage),
    #[serde(rename = "okay")]
    Okay(NoticeMessage),
    #[serde(rename = "update")]
    Update(UpdateMessage),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeMessage {
    #[serde(default)]
    pub message: String,
}

/// Full authoritative game snapshot.
///
/// The draw counter is read from `draws`, the name the server writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMessage {
    #[serde(default)]
    pub message: String,
    pub position: String,
    pub moves: Vec<String>,
    #[serde(rename = "player_colour", default, skip_serializing_if = "Option::is_none")]
    pub player_colour: Option<ColourLower>,
    #[serde(rename = "player_turn")]
    pub player_turn: bool,
    pub gameover: bool,
    #[serde(rename = "last_move", default, skip_serializing_if = "Option::is_none")]
    pub last_move: Option<String>,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColourLower {
    #[serde(rename = "white")]
    White,
    #[serde(rename = "black")]
    Black,
}

impl<'de> Deserialize<'de> for ColourLower {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match Colour::from_str(&s) {
            Some(c) => Ok(c.into()),
            None => Err(serde::de::Error::custom("invalid player colour")),
        }
    }
}

impl From<Colour> for ColourLower {
    fn from(value: Colour) -> Self {
        match value {
            Colour::White => Self::White,
            Colour::Black => Self::Black,
        }
    }
}

impl From<ColourLower> for Colour {
    fn from(value: ColourLower) -> Self {
        match value {
            ColourLower::White => Colour::White,
            ColourLower::Black => Colour::Black,
        }
    }
}

impl From<UpdateMessage> for ServerUpdate {
    fn from(value: UpdateMessage) -> Self {
        Self {
            message: value.message,
            position: value.position,
            moves: value.moves,
            player_colour: value.player_colour.map(Colour::from),
            player_turn: value.player_turn,
            game_over: value.gameover,
            last_move: value.last_move,
            wins: value.wins,
            losses: value.losses,
            draws: value.draws,
        }
    }
}

impl NoticeMessage {
    /// `error` and `okay` share this body; the tag decides the kind.
    pub fn into_notice(self, kind: NoticeKind) -> Notice {
        Notice::new(kind, self.message)
    }
}

// ============== Message Parsing ==============

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid json: {0}")]
    Json(#[source] serde_json::Error),

    #[error("message has no type tag")]
    MissingType,

    #[error("unknown message type {0:?}")]
    UnknownType(String),

    #[error("malformed {kind} message: {source}")]
    Malformed {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

const KNOWN_TYPES: [&str; 3] = ["error", "okay", "update"];

/// Parse one inbound text frame.
pub fn parse_message(json: &str) -> Result<ServerMessage, ProtocolError> {
    match serde_json::from_str::<ServerMessage>(json) {
        Ok(msg) => Ok(msg),
        Err(e) => {
            // Work out which failure this was so it can be reported precisely.
            #[derive(Debug, Deserialize)]
            struct TypeOnly {
                #[serde(rename = "type")]
                msg_type: Option<serde_json::Value>,
            }
            let msg_type = serde_json::from_str::<TypeOnly>(json)
                .map_err(ProtocolError::Json)?
                .msg_type;
            match msg_type {
                None => Err(ProtocolError::MissingType),
                Some(serde_json::Value::String(kind)) if KNOWN_TYPES.contains(&kind.as_str()) => {
                    Err(ProtocolError::Malformed { kind, source: e })
                }
                Some(serde_json::Value::String(kind)) => Err(ProtocolError::UnknownType(kind)),
                Some(other) => Err(ProtocolError::UnknownType(other.to_string())),
            }
        }
    }
}

/// Serialize a command for the wire.
pub fn encode_command(command: &Command) -> Result<String, serde_json::Error> {
    serde_json::to_string(&ClientMessage::from(command))
}

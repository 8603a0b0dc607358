//! Named events exchanged with the transport layer.
//!
//! Events are adjacently tagged, e.g.
//! `{"event": "place_bet", "data": {"amount": 100}}`.

use alloc::string::{String, ToString};

use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::game::PlayerInit;
use crate::view::TableView;

/// An action sent by a client.
///
/// Connects and disconnects are transport events and have no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Stage a bet during the betting phase.
    PlaceBet {
        /// Amount to add to the staged bet.
        amount: u64,
    },
    /// Draw a card on your turn.
    PlayerHit,
    /// End your turn.
    PlayerStand,
}

/// An event sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Sent only to a newly connected client.
    PlayerInit(PlayerInit),
    /// Broadcast to everyone after every change.
    GameStateUpdate(TableView),
    /// Sent only to the client whose action was refused.
    Error {
        /// Human-readable reason.
        message: String,
    },
}

impl From<TableError> for ServerEvent {
    fn from(err: TableError) -> Self {
        Self::Error {
            message: err.to_string(),
        }
    }
}

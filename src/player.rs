//! Player records and the registry that maps connections to them.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use hashbrown::HashMap;
use rand::RngCore;
use serde::{Deserialize, Serialize};
#[cfg(feature = "std")]
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::JoinError;
use crate::hand::Hand;

/// Opaque handle the transport assigns to a live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl core::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "conn#{}", self.0)
    }
}

/// Stable player identity, generated at connect time and independent of the
/// connection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(Uuid);

impl PlayerId {
    /// Generates a random (version 4) identity.
    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);
        Self(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }
}

impl From<Uuid> for PlayerId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl core::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Where a player stands in the round cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    /// Seated, no bet staged yet.
    Connected,
    /// Bet staged, round not yet dealt.
    #[serde(rename = "betting")]
    BettingOpen,
    /// Dealt in and still acting.
    Playing,
    /// Stood (including an automatic stand on 21).
    Stood,
    /// Went over 21.
    Busted,
    /// Natural 21 on the deal.
    Blackjack,
    /// Round settled; free to bet again.
    #[serde(rename = "ready")]
    Settled,
}

/// A seated player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Stable identity.
    pub id: PlayerId,
    /// Join sequence number, used to order turns.
    pub seat: u32,
    /// Display name.
    pub name: String,
    /// Spendable balance; staged bets are already deducted.
    pub balance: u64,
    /// Bet staged or in play this round.
    pub bet: u64,
    /// Current hand, kept visible until the next deal.
    pub hand: Hand,
    /// Round status.
    pub status: PlayerStatus,
    /// Last message addressed to this player.
    pub message: String,
}

impl Player {
    fn new(id: PlayerId, seat: u32, balance: u64) -> Self {
        Self {
            id,
            seat,
            name: format!("Player {seat}"),
            balance,
            bet: 0,
            hand: Hand::new(),
            status: PlayerStatus::Connected,
            message: String::from("Place your bet."),
        }
    }

    /// Returns the score of the player's hand.
    #[must_use]
    pub fn score(&self) -> u8 {
        self.hand.value()
    }
}

/// The set of seated players, keyed by identity and reachable by connection.
#[derive(Debug, Clone)]
pub struct PlayerRegistry {
    /// Players in seat order.
    players: Vec<Player>,
    /// Connection handle to player identity.
    connections: HashMap<ConnectionId, PlayerId>,
    /// Maximum number of seats.
    capacity: usize,
    /// Last seat number handed out.
    last_seat: u32,
}

impl PlayerRegistry {
    /// Creates an empty registry with the given number of seats.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            players: Vec::with_capacity(capacity),
            connections: HashMap::new(),
            capacity,
            last_seat: 0,
        }
    }

    /// Seats a new player for `connection`.
    ///
    /// # Errors
    ///
    /// Returns an error if every seat is taken or the connection already
    /// has a player.
    pub fn register<R: RngCore + ?Sized>(
        &mut self,
        connection: ConnectionId,
        starting_balance: u64,
        rng: &mut R,
    ) -> Result<&Player, JoinError> {
        if self.connections.contains_key(&connection) {
            return Err(JoinError::AlreadyConnected);
        }
        if self.players.len() >= self.capacity {
            return Err(JoinError::TableFull);
        }

        self.last_seat += 1;
        let id = PlayerId::random(rng);
        self.connections.insert(connection, id);
        self.players
            .push(Player::new(id, self.last_seat, starting_balance));

        Ok(&self.players[self.players.len() - 1])
    }

    /// Removes the player for `connection`, returning its final record.
    pub fn remove(&mut self, connection: ConnectionId) -> Option<Player> {
        let id = self.connections.remove(&connection)?;
        let index = self.players.iter().position(|p| p.id == id)?;
        Some(self.players.remove(index))
    }

    /// Looks up the player seated for `connection`.
    #[must_use]
    pub fn resolve(&self, connection: ConnectionId) -> Option<PlayerId> {
        self.connections.get(&connection).copied()
    }

    /// Returns the player with the given identity.
    #[must_use]
    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Returns the player with the given identity mutably.
    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Iterates players in seat order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Iterates players mutably in seat order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    /// Returns the number of seated players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns whether nobody is seated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

//! The authoritative state machine for a shared multiplayer blackjack table,
//! with optional `no_std` support.
//!
//! The crate provides a [`Table`] type that owns the deck, the dealer's hand
//! and the seated players, enforces phase and turn order, plays the dealer
//! automatically, and settles payouts. Every round cycles through
//! `betting -> dealing -> player_turn -> dealer_turn -> results -> betting`.
//! [`TableView`] renders the state that is safe to broadcast: the dealer's
//! hole card stays hidden until the dealer turn.
//!
//! With the `std` feature, [`gateway::TableGateway`] serializes actions from
//! many connections, broadcasts every resulting view, and paces dealer play
//! on a Tokio task.
//!
//! # Example
//!
//! ```
//! use bjtable::{Card, ConnectionId, Phase, PlayerStatus, Suit, Table, TableOptions};
//!
//! let mut table = Table::new(TableOptions::default(), 42);
//! let alice = table.connect(ConnectionId(1)).unwrap().id;
//!
//! table.preset_next_deck(&[
//!     Card::new(Suit::Spades, 10), // alice
//!     Card::new(Suit::Clubs, 9),   // dealer up
//!     Card::new(Suit::Hearts, 1),  // alice
//!     Card::new(Suit::Hearts, 9),  // dealer hole
//! ]);
//! table.place_bet(alice, 100).unwrap();
//!
//! // A natural needs no action, so the dealer is up at once.
//! assert_eq!(table.phase(), Phase::DealerTurn);
//! let result = table.dealer_play().unwrap();
//! assert_eq!(result.players[0].payout, 250);
//! assert_eq!(table.player(alice).unwrap().status, PlayerStatus::Settled);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(all(not(feature = "std"), not(feature = "alloc")))]
compile_error!(
    "`std` is disabled but `alloc` feature is not enabled. Enable `alloc` or keep `std` enabled."
);

extern crate alloc;

pub mod card;
pub mod deck;
pub mod error;
pub mod game;
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub mod gateway;
pub mod hand;
pub mod options;
pub mod player;
pub mod protocol;
pub mod result;
pub mod view;

// Re-export main types
pub use card::{Card, DECK_SIZE, Suit};
pub use deck::Deck;
#[cfg(feature = "std")]
pub use error::EntropyError;
pub use error::{
    ActionError, BetError, DeckExhausted, IllegalAction, JoinError, ShowdownError, TableError,
};
pub use game::{BetOutcome, DealerStep, Departure, Phase, PlayerInit, Table};
pub use hand::Hand;
pub use options::{RoundingMode, StartPolicy, TableOptions};
pub use player::{ConnectionId, Player, PlayerId, PlayerRegistry, PlayerStatus};
pub use protocol::{ClientEvent, ServerEvent};
pub use result::{HandOutcome, PlayerResult, RoundResult};
pub use view::{CardView, PlayerView, TableView};

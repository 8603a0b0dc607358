//! Round state machine and table state.

use alloc::string::String;
use alloc::vec::Vec;

use rand::SeedableRng;
#[cfg(feature = "std")]
use rand::{TryRngCore, rngs::OsRng};
use rand_chacha::ChaCha8Rng;

use crate::card::Card;
use crate::deck::Deck;
#[cfg(feature = "std")]
use crate::error::EntropyError;
use crate::error::JoinError;
use crate::hand::Hand;
use crate::options::TableOptions;
use crate::player::{ConnectionId, Player, PlayerId, PlayerRegistry, PlayerStatus};
use crate::view::TableView;

mod actions;
mod bet;
mod dealer;
pub mod state;

pub use bet::BetOutcome;
pub use state::{DealerStep, Phase};

/// What a freshly connected client is told about itself.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PlayerInit {
    /// The stable player identity.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Starting balance.
    pub balance: u64,
}

/// A player leaving the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// The record as it was removed.
    pub player: Player,
    /// Bet lost because the player left a dealt round.
    pub forfeited_bet: u64,
}

/// A blackjack table: one deck, one dealer, and the players seated at it.
///
/// The table owns every piece of round state and is mutated only through
/// `&mut self`, so wrapping it in a single lock (as
/// [`TableGateway`](crate::gateway::TableGateway) does) serializes all
/// actions.
#[derive(Debug, Clone)]
pub struct Table {
    /// Table options.
    options: TableOptions,
    /// Seated players.
    registry: PlayerRegistry,
    /// Cards left for the current round.
    deck: Deck,
    /// Prearranged deck to use instead of the next shuffle.
    next_deck: Option<Deck>,
    /// Dealer's hand.
    dealer: Hand,
    /// Current phase.
    phase: Phase,
    /// Bettors dealt into this round, in seat order.
    turn_order: Vec<PlayerId>,
    /// Index into `turn_order` of the acting player.
    turn_index: usize,
    /// Whether dealer auto-play has been handed out for this round.
    dealer_claimed: bool,
    /// Random number generator.
    rng: ChaCha8Rng,
}

impl Table {
    /// Creates a new table with the given seed.
    ///
    /// # Example
    ///
    /// ```
    /// use bjtable::{Phase, Table, TableOptions};
    ///
    /// let table = Table::new(TableOptions::default(), 42);
    /// assert_eq!(table.phase(), Phase::Betting);
    /// ```
    #[must_use]
    pub fn new(options: TableOptions, seed: u64) -> Self {
        Self::with_rng(options, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Creates a new table seeded from the operating system.
    ///
    /// # Errors
    ///
    /// Returns an error if the operating system cannot provide randomness.
    /// The table never falls back to a fixed order.
    #[cfg(feature = "std")]
    pub fn from_entropy(options: TableOptions) -> Result<Self, EntropyError> {
        let mut seed = <ChaCha8Rng as SeedableRng>::Seed::default();
        OsRng.try_fill_bytes(&mut seed)?;
        Ok(Self::with_rng(options, ChaCha8Rng::from_seed(seed)))
    }

    fn with_rng(options: TableOptions, mut rng: ChaCha8Rng) -> Self {
        let deck = Deck::shuffled(&mut rng);
        Self {
            registry: PlayerRegistry::new(options.max_players),
            options,
            deck,
            next_deck: None,
            dealer: Hand::new(),
            phase: Phase::Betting,
            turn_order: Vec::new(),
            turn_index: 0,
            dealer_claimed: false,
            rng,
        }
    }

    /// Seats a player for a new connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is full or the connection is already
    /// seated.
    pub fn connect(&mut self, connection: ConnectionId) -> Result<PlayerInit, JoinError> {
        let player =
            self.registry
                .register(connection, self.options.starting_balance, &mut self.rng)?;
        log::info!("{} joined as {} ({})", connection, player.name, player.id);

        Ok(PlayerInit {
            id: player.id,
            name: player.name.clone(),
            balance: player.balance,
        })
    }

    /// Removes the player for a closed connection.
    ///
    /// A player holding the turn is auto-stood first so the round keeps
    /// moving. Bets staged before the deal are refunded into the returned
    /// record; bets in a dealt round are forfeited. During betting the start
    /// condition is re-checked for the remaining players.
    ///
    /// Returns `None` if the connection had no player.
    pub fn disconnect(&mut self, connection: ConnectionId) -> Option<Departure> {
        let id = self.registry.resolve(connection)?;

        if self.current_player() == Some(id) {
            self.forfeit_current_turn();
        }

        let mut player = self.registry.remove(connection)?;
        let forfeited_bet = if self.turn_order.contains(&id) && self.phase != Phase::Betting {
            player.bet
        } else {
            player.balance += player.bet;
            player.bet = 0;
            0
        };
        log::info!(
            "{} left ({}), forfeiting {}",
            player.name,
            connection,
            forfeited_bet
        );

        if self.phase == Phase::Betting {
            if let Err(err) = self.try_start_round() {
                log::error!("round start after disconnect failed: {err}");
            }
        }

        Some(Departure {
            player,
            forfeited_bet,
        })
    }

    /// Looks up the player seated for `connection`.
    #[must_use]
    pub fn resolve(&self, connection: ConnectionId) -> Option<PlayerId> {
        self.registry.resolve(connection)
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the table options.
    #[must_use]
    pub const fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Returns the player whose turn it is.
    ///
    /// Returns `None` outside the player turn phase.
    #[must_use]
    pub fn current_player(&self) -> Option<PlayerId> {
        if self.phase != Phase::PlayerTurn {
            return None;
        }
        self.turn_order.get(self.turn_index).copied()
    }

    /// Returns the bettors dealt into the current round, in turn order.
    #[must_use]
    pub fn turn_order(&self) -> &[PlayerId] {
        &self.turn_order
    }

    /// Returns the player with the given identity.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.registry.get(id)
    }

    /// Returns the seated players.
    #[must_use]
    pub const fn players(&self) -> &PlayerRegistry {
        &self.registry
    }

    /// Returns the dealer's hand, including any hidden card.
    #[must_use]
    pub const fn dealer_hand(&self) -> &Hand {
        &self.dealer
    }

    /// Returns the number of cards remaining in the deck.
    #[must_use]
    pub fn cards_remaining(&self) -> usize {
        self.deck.len()
    }

    /// Queues a prearranged deck for the next round instead of a shuffle.
    ///
    /// `draws` lists cards in the order they will be dealt.
    pub fn preset_next_deck(&mut self, draws: &[Card]) {
        self.next_deck = Some(Deck::from_draw_order(draws));
    }

    /// Builds the redacted broadcast view of the table.
    #[must_use]
    pub fn view(&self) -> TableView {
        TableView::project(self)
    }

    /// Hands dealer auto-play to the caller, once per round.
    ///
    /// Returns `true` exactly once after the table enters the dealer turn;
    /// the caller then owns driving [`Table::dealer_step`] to settlement.
    pub fn claim_dealer_turn(&mut self) -> bool {
        if self.phase == Phase::DealerTurn && !self.dealer_claimed {
            self.dealer_claimed = true;
            true
        } else {
            false
        }
    }

    /// Abandons the current round after the deck ran out.
    ///
    /// Every present player's bet is refunded and the table returns to
    /// betting. Player hands are left in place so the aborted deal stays
    /// visible.
    pub fn abort_round(&mut self) {
        log::error!(
            "aborting round in phase {:?}: deck exhausted with {} players dealt",
            self.phase,
            self.turn_order.len()
        );

        for player in self.registry.iter_mut() {
            if player.bet > 0 {
                player.balance += player.bet;
                player.bet = 0;
                player.status = PlayerStatus::Settled;
                player.message = String::from("Round aborted. Your bet was refunded.");
            }
        }

        self.reset_round();
    }

    fn reset_round(&mut self) {
        self.dealer.clear();
        self.turn_order.clear();
        self.turn_index = 0;
        self.dealer_claimed = false;
        self.phase = Phase::Betting;
    }

    fn draw(&mut self) -> Result<Card, crate::error::DeckExhausted> {
        self.deck.draw()
    }
}

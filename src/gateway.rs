//! The action gateway: the single serialization point between the transport
//! and the table.
//!
//! Every action takes the table lock, validates, mutates, and broadcasts the
//! new [`TableView`] before releasing it, so subscribers observe states in
//! the order they were applied. Dealer auto-play runs on its own Tokio task
//! and re-takes the lock once per draw; the pause between draws is spent
//! unlocked.
//!
//! # Ordering
//!
//! Actions never interleave, and calls made one after another (such as a
//! connection's reader loop awaiting each event in turn) are applied in call
//! order. Calls that race for the lock from different threads are applied
//! one at a time in lock acquisition order, which is not guaranteed to be
//! first-come first-served.
//!
//! ```no_run
//! use bjtable::{ClientEvent, ConnectionId, Table, TableOptions};
//! use bjtable::gateway::TableGateway;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = TableGateway::new(Table::from_entropy(TableOptions::default())?);
//! let mut updates = gateway.subscribe();
//!
//! let init = gateway.connect(ConnectionId(1))?;
//! println!("seated as {}", init.name);
//!
//! if let Some(reply) = gateway.dispatch(ConnectionId(1), ClientEvent::PlaceBet { amount: 100 }) {
//!     println!("refused: {reply:?}");
//! }
//! let _state = updates.recv().await?;
//! # Ok(())
//! # }
//! ```

use alloc::sync::Arc;
use core::time::Duration;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use crate::card::Card;
use crate::error::TableError;
use crate::game::{BetOutcome, DealerStep, Departure, PlayerInit, Table};
use crate::player::{ConnectionId, PlayerId};
use crate::protocol::{ClientEvent, ServerEvent};
use crate::view::TableView;

struct Shared {
    /// The authoritative table.
    table: Mutex<Table>,
    /// State update fan-out.
    updates: broadcast::Sender<ServerEvent>,
    /// Pause before each dealer step.
    dealer_pause: Duration,
}

impl Shared {
    /// Locks the table, ignoring poisoning.
    fn lock(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, table: &Table) {
        // No subscribers is not an error.
        let _ = self
            .updates
            .send(ServerEvent::GameStateUpdate(table.view()));
    }
}

/// Cloneable handle to a shared table.
#[derive(Clone)]
pub struct TableGateway {
    shared: Arc<Shared>,
}

impl TableGateway {
    /// Wraps a table for concurrent use.
    #[must_use]
    pub fn new(table: Table) -> Self {
        let options = table.options();
        let (updates, _) = broadcast::channel(options.update_capacity.max(1));
        let dealer_pause = options.dealer_pause();

        Self {
            shared: Arc::new(Shared {
                table: Mutex::new(table),
                updates,
                dealer_pause,
            }),
        }
    }

    /// Subscribes to `game_state_update` broadcasts.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.shared.updates.subscribe()
    }

    /// Returns the current public view.
    #[must_use]
    pub fn snapshot(&self) -> TableView {
        self.shared.lock().view()
    }

    /// Runs `f` against the authoritative (unredacted) table.
    pub fn inspect<R>(&self, f: impl FnOnce(&Table) -> R) -> R {
        f(&self.shared.lock())
    }

    /// Seats a player for a new connection and broadcasts the table.
    ///
    /// The returned [`PlayerInit`] is meant for the new connection alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is full or the connection is already
    /// seated.
    pub fn connect(&self, connection: ConnectionId) -> Result<PlayerInit, TableError> {
        let mut table = self.shared.lock();
        let init = table.connect(connection)?;
        self.shared.publish(&table);
        Ok(init)
    }

    /// Removes the player for a closed connection and broadcasts the table.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownPlayer`] if the connection had no player.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime while the departure hands
    /// the round to the dealer.
    pub fn disconnect(&self, connection: ConnectionId) -> Result<Departure, TableError> {
        let mut table = self.shared.lock();
        let Some(departure) = table.disconnect(connection) else {
            log::warn!("disconnect from unseated {connection}");
            return Err(TableError::UnknownPlayer);
        };

        self.shared.publish(&table);
        self.start_dealer_if_due(&mut table);
        Ok(departure)
    }

    /// Stages a bet for the player on `connection`.
    ///
    /// # Errors
    ///
    /// See [`Table::place_bet`].
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime while the bet deals a round
    /// that goes straight to the dealer.
    pub fn place_bet(
        &self,
        connection: ConnectionId,
        amount: u64,
    ) -> Result<BetOutcome, TableError> {
        self.apply(connection, |table, player| {
            table.place_bet(player, amount).map_err(Into::into)
        })
    }

    /// Hits for the player on `connection`.
    ///
    /// # Errors
    ///
    /// See [`Table::hit`].
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime while the hit ends the
    /// player turn.
    pub fn hit(&self, connection: ConnectionId) -> Result<Card, TableError> {
        self.apply(connection, |table, player| {
            table.hit(player).map_err(Into::into)
        })
    }

    /// Stands for the player on `connection`.
    ///
    /// # Errors
    ///
    /// See [`Table::stand`].
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime while the stand ends the
    /// player turn.
    pub fn stand(&self, connection: ConnectionId) -> Result<(), TableError> {
        self.apply(connection, |table, player| {
            table.stand(player).map_err(Into::into)
        })
    }

    /// Applies a client event and returns the private reply, if any.
    ///
    /// Refusals produce an `error` event for the requester only. Events
    /// from unseated connections are dropped.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime while the event hands the
    /// round to the dealer.
    pub fn dispatch(&self, connection: ConnectionId, event: ClientEvent) -> Option<ServerEvent> {
        let result = match event {
            ClientEvent::PlaceBet { amount } => self.place_bet(connection, amount).map(|_| ()),
            ClientEvent::PlayerHit => self.hit(connection).map(|_| ()),
            ClientEvent::PlayerStand => self.stand(connection),
        };

        match result {
            Ok(()) | Err(TableError::UnknownPlayer) => None,
            Err(err) => Some(err.into()),
        }
    }

    fn apply<T>(
        &self,
        connection: ConnectionId,
        action: impl FnOnce(&mut Table, PlayerId) -> Result<T, TableError>,
    ) -> Result<T, TableError> {
        let mut table = self.shared.lock();
        let Some(player) = table.resolve(connection) else {
            log::warn!("discarding action from unseated {connection}");
            return Err(TableError::UnknownPlayer);
        };

        let result = action(&mut table, player);
        match &result {
            Ok(_) | Err(TableError::DeckExhausted) => {
                self.shared.publish(&table);
                self.start_dealer_if_due(&mut table);
            }
            Err(err) => log::debug!("refused action from {connection}: {err}"),
        }

        result
    }

    fn start_dealer_if_due(&self, table: &mut Table) {
        if table.claim_dealer_turn() {
            tokio::spawn(run_dealer(Arc::clone(&self.shared)));
        }
    }
}

/// Drives the dealer to settlement, one locked step per pause.
async fn run_dealer(shared: Arc<Shared>) {
    loop {
        tokio::time::sleep(shared.dealer_pause).await;

        let finished = {
            let mut table = shared.lock();
            match table.dealer_step() {
                Ok(DealerStep::Drew(_)) => {
                    shared.publish(&table);
                    false
                }
                Ok(DealerStep::Settled(result)) => {
                    shared.publish(&table);
                    log::info!(
                        "dealer stands on {}; {} results posted",
                        result.dealer_value,
                        result.players.len()
                    );
                    if let Err(err) = table.finish_round() {
                        log::error!("could not reopen betting: {err}");
                    }
                    shared.publish(&table);
                    true
                }
                Err(err) => {
                    log::error!("dealer turn ended early: {err}");
                    shared.publish(&table);
                    true
                }
            }
        };

        if finished {
            break;
        }
    }
}

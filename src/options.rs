//! Table configuration options.

use serde::{Deserialize, Serialize};

/// Rounding mode for payouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMode {
    /// Round up.
    Up,
    /// Round down.
    Down,
    /// Round to nearest.
    Nearest,
}

/// When a betting phase turns into a dealt round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum StartPolicy {
    /// Deal once every seated player has staged a bet.
    #[default]
    AllPlayers,
    /// Deal as soon as any player stages a bet.
    FirstBet,
}

/// Configuration options for a blackjack table.
///
/// Use the builder pattern to customize options:
///
/// ```
/// use bjtable::TableOptions;
///
/// let options = TableOptions::default()
///     .with_starting_balance(2500)
///     .with_max_players(6)
///     .with_dealer_pause_ms(1000);
/// ```
///
/// Options deserialize with every field optional:
///
/// ```
/// use bjtable::{StartPolicy, TableOptions};
///
/// let options: TableOptions =
///     serde_json::from_str(r#"{"start_policy": "first_bet"}"#).unwrap();
/// assert_eq!(options.start_policy, StartPolicy::FirstBet);
/// assert_eq!(options.starting_balance, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Balance every new player starts with.
    pub starting_balance: u64,
    /// Maximum number of seated players.
    pub max_players: usize,
    /// The dealer draws while below this total and stands at or above it.
    pub dealer_stands_on: u8,
    /// Blackjack payout ratio (typically 1.5).
    pub blackjack_pays: f64,
    /// Rounding mode for blackjack payouts.
    pub rounding_blackjack: RoundingMode,
    /// Pause between dealer draws, in milliseconds.
    pub dealer_pause_ms: u64,
    /// When the betting phase closes.
    pub start_policy: StartPolicy,
    /// Buffered state updates per subscriber before old ones are dropped.
    pub update_capacity: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            starting_balance: 1000,
            max_players: 4,
            dealer_stands_on: 17,
            blackjack_pays: 1.5,
            rounding_blackjack: RoundingMode::Down,
            dealer_pause_ms: 500,
            start_policy: StartPolicy::AllPlayers,
            update_capacity: 64,
        }
    }
}

impl TableOptions {
    /// Sets the starting balance.
    ///
    /// # Example
    ///
    /// ```
    /// use bjtable::TableOptions;
    ///
    /// let options = TableOptions::default().with_starting_balance(500);
    /// assert_eq!(options.starting_balance, 500);
    /// ```
    #[must_use]
    pub const fn with_starting_balance(mut self, balance: u64) -> Self {
        self.starting_balance = balance;
        self
    }

    /// Sets the maximum number of seated players.
    #[must_use]
    pub const fn with_max_players(mut self, max_players: usize) -> Self {
        self.max_players = max_players;
        self
    }

    /// Sets the total the dealer stands on.
    ///
    /// # Example
    ///
    /// ```
    /// use bjtable::TableOptions;
    ///
    /// let options = TableOptions::default().with_dealer_stands_on(18);
    /// assert_eq!(options.dealer_stands_on, 18);
    /// ```
    #[must_use]
    pub const fn with_dealer_stands_on(mut self, total: u8) -> Self {
        self.dealer_stands_on = total;
        self
    }

    /// Sets the blackjack payout ratio.
    #[must_use]
    pub const fn with_blackjack_pays(mut self, ratio: f64) -> Self {
        self.blackjack_pays = ratio;
        self
    }

    /// Sets the rounding mode for blackjack payouts.
    #[must_use]
    pub const fn with_rounding_blackjack(mut self, mode: RoundingMode) -> Self {
        self.rounding_blackjack = mode;
        self
    }

    /// Sets the pause between dealer draws.
    ///
    /// # Example
    ///
    /// ```
    /// use bjtable::TableOptions;
    ///
    /// let options = TableOptions::default().with_dealer_pause_ms(0);
    /// assert_eq!(options.dealer_pause_ms, 0);
    /// ```
    #[must_use]
    pub const fn with_dealer_pause_ms(mut self, millis: u64) -> Self {
        self.dealer_pause_ms = millis;
        self
    }

    /// Sets when the betting phase closes.
    #[must_use]
    pub const fn with_start_policy(mut self, policy: StartPolicy) -> Self {
        self.start_policy = policy;
        self
    }

    /// Sets the state update buffer depth.
    #[must_use]
    pub const fn with_update_capacity(mut self, capacity: usize) -> Self {
        self.update_capacity = capacity;
        self
    }

    /// Returns the dealer pacing delay.
    #[must_use]
    pub const fn dealer_pause(&self) -> core::time::Duration {
        core::time::Duration::from_millis(self.dealer_pause_ms)
    }
}

//! Round phase types.

use serde::{Deserialize, Serialize};

/// The single global stage of the round cycle.
///
/// Phases always advance `Betting -> Dealing -> PlayerTurn -> DealerTurn ->
/// Results -> Betting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Accepting bets for the next round.
    #[default]
    Betting,
    /// Dealing initial cards.
    Dealing,
    /// Waiting for player actions.
    PlayerTurn,
    /// Dealer plays out their hand.
    DealerTurn,
    /// Round has been settled.
    Results,
}

impl Phase {
    /// Returns whether the dealer's hole card is public in this phase.
    #[must_use]
    pub const fn reveals_dealer(self) -> bool {
        matches!(self, Self::DealerTurn | Self::Results)
    }
}

/// One step of dealer auto-play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DealerStep {
    /// The dealer drew a card and must be stepped again.
    Drew(crate::card::Card),
    /// The dealer stood and the round was settled.
    Settled(crate::result::RoundResult),
}

//! Round result types for settlement.

use alloc::vec::Vec;

use crate::player::PlayerId;

/// How a player's round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandOutcome {
    /// Natural 21 on the deal.
    Blackjack,
    /// Player wins (dealer busts or player has higher value).
    Win,
    /// Player loses (player busts or dealer has higher value).
    Lose,
    /// Push (tie); the bet is returned.
    Push,
    /// The player was in the turn order with no bet.
    SatOut,
}

/// Result for a single player after settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerResult {
    /// The player ID.
    pub player_id: PlayerId,
    /// The outcome of the hand.
    pub outcome: HandOutcome,
    /// The bet that was in play.
    pub bet: u64,
    /// Amount credited back to the balance.
    pub payout: u64,
    /// Net result (positive = profit, negative = loss).
    pub net: i64,
    /// The player's hand value.
    pub player_value: u8,
}

/// Result of the entire round after settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    /// Results for each player still seated, in turn order.
    pub players: Vec<PlayerResult>,
    /// The dealer's final hand value.
    pub dealer_value: u8,
    /// Whether the dealer busted.
    pub dealer_bust: bool,
}

impl RoundResult {
    /// Returns the result for `player_id`, if they were settled this round.
    #[must_use]
    pub fn player(&self, player_id: PlayerId) -> Option<&PlayerResult> {
        self.players.iter().find(|r| r.player_id == player_id)
    }
}

//! Redacted, broadcast-safe views of the table.
//!
//! Everything about the players is public. The only secret is the dealer's
//! hole card: until the dealer turn, every dealer card after the first is
//! replaced by [`CardView::HIDDEN`] and the dealer score counts only the up
//! card.

use alloc::string::String;
use alloc::vec::Vec;

use serde::Serialize;

use crate::card::Card;
use crate::game::{Phase, Table};
use crate::hand::score;
use crate::player::{Player, PlayerId, PlayerStatus};

/// A card as clients see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardView {
    /// Rank label, or `Hidden` for the placeholder.
    pub value: &'static str,
    /// Suit symbol, or `?` for the placeholder.
    pub suit: &'static str,
}

impl CardView {
    /// Placeholder shown in place of an unrevealed card.
    pub const HIDDEN: Self = Self {
        value: "Hidden",
        suit: "?",
    };

    /// Returns whether this is the placeholder.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        *self == Self::HIDDEN
    }
}

impl From<Card> for CardView {
    fn from(card: Card) -> Self {
        Self {
            value: card.label(),
            suit: card.suit.symbol(),
        }
    }
}

/// A player as every client sees them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    /// Stable player identity.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Spendable balance.
    pub balance: u64,
    /// Bet staged or in play.
    pub bet: u64,
    /// Cards in hand.
    pub hand: Vec<CardView>,
    /// Hand score.
    pub score: u8,
    /// Round status.
    pub status: PlayerStatus,
    /// Last message addressed to the player.
    pub message: String,
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            balance: player.balance,
            bet: player.bet,
            hand: player.hand.cards().iter().copied().map(CardView::from).collect(),
            score: player.score(),
            status: player.status,
            message: player.message.clone(),
        }
    }
}

/// The full table state as broadcast to every client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    /// Current phase.
    pub phase: Phase,
    /// Seated players in seat order.
    pub players: Vec<PlayerView>,
    /// Dealer's cards, with unrevealed cards replaced by placeholders.
    pub dealer_hand: Vec<CardView>,
    /// Dealer score over the revealed cards only.
    pub dealer_score: u8,
    /// Player whose turn it is, during the player turn phase.
    pub turn_id: Option<PlayerId>,
}

impl TableView {
    /// Projects the table into its public form.
    #[must_use]
    pub fn project(table: &Table) -> Self {
        let phase = table.phase();
        let dealer = table.dealer_hand();
        let cards = dealer.cards();

        let (dealer_hand, dealer_score) = match dealer.up_card() {
            Some(&up) if !phase.reveals_dealer() && cards.len() >= 2 => {
                let mut shown: Vec<CardView> = Vec::with_capacity(cards.len());
                shown.push(CardView::from(up));
                shown.resize(cards.len(), CardView::HIDDEN);
                (shown, score(&[up]))
            }
            _ => (
                cards.iter().copied().map(CardView::from).collect(),
                score(cards),
            ),
        };

        Self {
            phase,
            players: table.players().iter().map(PlayerView::from).collect(),
            dealer_hand,
            dealer_score,
            turn_id: table.current_player(),
        }
    }

    /// Returns the view of one player.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Returns the number of dealer cards shown face up.
    #[must_use]
    pub fn revealed_dealer_cards(&self) -> usize {
        self.dealer_hand.iter().filter(|c| !c.is_hidden()).count()
    }
}

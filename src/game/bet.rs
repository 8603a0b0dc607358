use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::deck::Deck;
use crate::error::{BetError, DeckExhausted};
use crate::options::StartPolicy;
use crate::player::{PlayerId, PlayerStatus};

use super::{Phase, Table};

/// What happened after a bet was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetOutcome {
    /// The bet is staged; the table is still taking bets.
    Staged,
    /// The bet closed betting and the round was dealt.
    RoundStarted,
}

impl Table {
    /// Stages a bet for the specified player.
    ///
    /// The amount is deducted from the balance immediately. If the bet
    /// satisfies the table's start policy, the round is dealt before this
    /// returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is not taking bets, the player cannot be
    /// found, the bet is zero, or the player lacks funds. If the deal itself
    /// runs out of cards the round is aborted, every staged bet (this one
    /// included) is refunded, and [`BetError::DeckExhausted`] is returned.
    pub fn place_bet(&mut self, player_id: PlayerId, amount: u64) -> Result<BetOutcome, BetError> {
        if self.phase != Phase::Betting {
            return Err(BetError::InvalidState);
        }

        let player = self
            .registry
            .get_mut(player_id)
            .ok_or(BetError::PlayerNotFound)?;

        if amount == 0 {
            return Err(BetError::ZeroBet);
        }
        if player.balance < amount {
            return Err(BetError::InsufficientFunds);
        }

        player.balance -= amount;
        player.bet += amount;
        player.status = PlayerStatus::BettingOpen;
        player.message = format!("Bet placed: ${}", player.bet);
        log::debug!("{} staged {} (total {})", player.name, amount, player.bet);

        if self.try_start_round()? {
            Ok(BetOutcome::RoundStarted)
        } else {
            Ok(BetOutcome::Staged)
        }
    }

    /// Returns whether the staged bets satisfy the start policy.
    ///
    /// Under [`StartPolicy::AllPlayers`], players with nothing staged and no
    /// balance left cannot bet and are not waited for.
    #[must_use]
    pub fn ready_to_deal(&self) -> bool {
        if self.phase != Phase::Betting {
            return false;
        }

        let mut bettors = self.registry.iter().filter(|p| p.bet > 0);
        match self.options.start_policy {
            StartPolicy::FirstBet => bettors.next().is_some(),
            StartPolicy::AllPlayers => {
                bettors.next().is_some()
                    && self.registry.iter().all(|p| p.bet > 0 || p.balance == 0)
            }
        }
    }

    /// Deals the round if betting is complete.
    ///
    /// Returns `true` if a round was dealt.
    ///
    /// # Errors
    ///
    /// Returns [`BetError::DeckExhausted`] if the deck cannot cover the deal;
    /// the round is aborted and staged bets refunded.
    pub fn try_start_round(&mut self) -> Result<bool, BetError> {
        if !self.ready_to_deal() {
            return Ok(false);
        }

        if let Err(err) = self.start_round() {
            self.abort_round();
            return Err(err.into());
        }

        Ok(true)
    }

    /// Freezes the turn order, reshuffles, and deals two cards each.
    fn start_round(&mut self) -> Result<(), DeckExhausted> {
        self.phase = Phase::Dealing;
        self.dealer_claimed = false;
        self.turn_index = 0;
        self.turn_order = self
            .registry
            .iter()
            .filter(|p| p.bet > 0)
            .map(|p| p.id)
            .collect();

        self.deck = self
            .next_deck
            .take()
            .unwrap_or_else(|| Deck::shuffled(&mut self.rng));

        let cards_needed = (self.turn_order.len() + 1) * 2;
        if self.deck.len() < cards_needed {
            return Err(DeckExhausted);
        }

        for player in self.registry.iter_mut() {
            player.hand.clear();
        }
        self.dealer.clear();

        log::info!(
            "dealing round to {} players ({} cards in deck)",
            self.turn_order.len(),
            self.deck.len()
        );

        let order: Vec<PlayerId> = self.turn_order.clone();
        for _ in 0..2 {
            for &player_id in &order {
                let card = self.draw()?;
                if let Some(player) = self.registry.get_mut(player_id) {
                    player.hand.add_card(card);
                }
            }
            let card = self.draw()?;
            self.dealer.add_card(card);
        }

        for &player_id in &order {
            if let Some(player) = self.registry.get_mut(player_id) {
                if player.hand.is_blackjack() {
                    player.status = PlayerStatus::Blackjack;
                    player.message = String::from("BLACKJACK! Waiting for the results phase.");
                } else {
                    player.status = PlayerStatus::Playing;
                    player.message = String::from("Waiting for your turn.");
                }
            }
        }

        self.phase = Phase::PlayerTurn;
        self.seek_active_turn();
        Ok(())
    }
}

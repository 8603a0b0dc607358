use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::ShowdownError;
use crate::options::RoundingMode;
use crate::player::PlayerStatus;
use crate::result::{HandOutcome, PlayerResult, RoundResult};

use super::{DealerStep, Phase, Table};

#[cfg(feature = "std")]
fn round_amount(amount: f64, mode: RoundingMode) -> u64 {
    match mode {
        RoundingMode::Up => amount.ceil() as u64,
        RoundingMode::Down => amount.floor() as u64,
        RoundingMode::Nearest => amount.round() as u64,
    }
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn round_amount(amount: f64, mode: RoundingMode) -> u64 {
    match mode {
        RoundingMode::Up => libm::ceil(amount) as u64,
        RoundingMode::Down => libm::floor(amount) as u64,
        RoundingMode::Nearest => libm::round(amount) as u64,
    }
}

#[expect(clippy::cast_possible_wrap, reason = "balances stay far below i64::MAX")]
const fn net(payout: u64, bet: u64) -> i64 {
    payout as i64 - bet as i64
}

impl Table {
    /// Advances dealer auto-play by one step.
    ///
    /// Below the stand total the dealer draws one card. Otherwise the round
    /// is settled and the table moves to [`Phase::Results`].
    ///
    /// # Errors
    ///
    /// Returns an error if the table is not in the dealer turn. If the deck is
    /// empty the round is aborted and [`ShowdownError::DeckExhausted`] is
    /// returned.
    pub fn dealer_step(&mut self) -> Result<DealerStep, ShowdownError> {
        if self.phase != Phase::DealerTurn {
            return Err(ShowdownError::InvalidState);
        }

        if self.dealer.value() >= self.options.dealer_stands_on {
            return Ok(DealerStep::Settled(self.settle()));
        }

        let card = match self.draw() {
            Ok(card) => card,
            Err(err) => {
                self.abort_round();
                return Err(err.into());
            }
        };
        self.dealer.add_card(card);
        log::debug!("dealer draws {} for {}", card, self.dealer.value());

        Ok(DealerStep::Drew(card))
    }

    /// Plays the dealer's hand out without pacing and settles the round.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is not in the dealer turn or the deck
    /// runs out.
    pub fn dealer_play(&mut self) -> Result<RoundResult, ShowdownError> {
        loop {
            if let DealerStep::Settled(result) = self.dealer_step()? {
                return Ok(result);
            }
        }
    }

    /// Returns a settled table to betting for the next round.
    ///
    /// Bets, turn order and the dealer's hand are cleared; player hands stay
    /// visible until the next deal.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is not showing results.
    pub fn finish_round(&mut self) -> Result<(), ShowdownError> {
        if self.phase != Phase::Results {
            return Err(ShowdownError::InvalidState);
        }

        self.reset_round();
        Ok(())
    }

    /// Rounds a blackjack bonus according to the table options.
    fn blackjack_payout(&self, bet: u64) -> u64 {
        #[expect(
            clippy::cast_precision_loss,
            reason = "f64 has sufficient precision for monetary values"
        )]
        let bonus = (bet as f64) * self.options.blackjack_pays;
        bet + round_amount(bonus, self.options.rounding_blackjack)
    }

    /// Compares every dealt hand to the dealer and pays out.
    fn settle(&mut self) -> RoundResult {
        self.phase = Phase::Results;

        let dealer_value = self.dealer.value();
        let dealer_bust = dealer_value > 21;
        let mut players = Vec::with_capacity(self.turn_order.len());

        for index in 0..self.turn_order.len() {
            let player_id = self.turn_order[index];
            let blackjack_payout = self
                .registry
                .get(player_id)
                .map_or(0, |p| self.blackjack_payout(p.bet));
            let Some(player) = self.registry.get_mut(player_id) else {
                continue;
            };

            let bet = player.bet;
            let player_value = player.score();

            let (outcome, payout, message) = if bet == 0 {
                (
                    HandOutcome::SatOut,
                    0,
                    String::from("You sat out this round."),
                )
            } else if player.status == PlayerStatus::Blackjack {
                (
                    HandOutcome::Blackjack,
                    blackjack_payout,
                    format!(
                        "BLACKJACK! You win 3:2! Won ${}.",
                        blackjack_payout - bet
                    ),
                )
            } else if player.status == PlayerStatus::Busted {
                (
                    HandOutcome::Lose,
                    0,
                    format!("Bust! Dealer wins. Lost ${bet}."),
                )
            } else if dealer_bust {
                (
                    HandOutcome::Win,
                    bet * 2,
                    format!("Dealer busts! You win 1:1! Won ${bet}."),
                )
            } else if player_value > dealer_value {
                (
                    HandOutcome::Win,
                    bet * 2,
                    format!("You beat the Dealer! Won ${bet}."),
                )
            } else if player_value < dealer_value {
                (
                    HandOutcome::Lose,
                    0,
                    format!("Dealer wins. Lost ${bet}."),
                )
            } else {
                (
                    HandOutcome::Push,
                    bet,
                    format!("Push (Tie). Your bet of ${bet} is returned."),
                )
            };

            player.balance += payout;
            player.bet = 0;
            player.status = PlayerStatus::Settled;
            player.message = message;

            players.push(PlayerResult {
                player_id,
                outcome,
                bet,
                payout,
                net: net(payout, bet),
                player_value,
            });
        }

        log::info!(
            "round settled: dealer {}{}, {} players paid",
            dealer_value,
            if dealer_bust { " (bust)" } else { "" },
            players.len()
        );

        RoundResult {
            players,
            dealer_value,
            dealer_bust,
        }
    }
}

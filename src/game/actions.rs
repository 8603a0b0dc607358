use alloc::format;
use alloc::string::String;

use crate::card::Card;
use crate::error::ActionError;
use crate::player::{PlayerId, PlayerStatus};

use super::{Phase, Table};

impl Table {
    fn ensure_player_turn(&self, player_id: PlayerId) -> Result<(), ActionError> {
        if self.phase != Phase::PlayerTurn {
            return Err(ActionError::InvalidState);
        }

        let player = self
            .registry
            .get(player_id)
            .ok_or(ActionError::PlayerNotFound)?;

        if self.current_player() != Some(player_id) {
            return Err(ActionError::NotYourTurn);
        }

        if player.status != PlayerStatus::Playing {
            return Err(ActionError::NotPlaying);
        }

        Ok(())
    }

    /// Player action: Hit (draw a card).
    ///
    /// Going over 21 busts the player and reaching exactly 21 stands them;
    /// either way the turn advances.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is not in the player turn phase, the
    /// player cannot be found, it is not their turn, or they are no longer
    /// playing. If the deck is empty the round is aborted and
    /// [`ActionError::DeckExhausted`] is returned.
    pub fn hit(&mut self, player_id: PlayerId) -> Result<Card, ActionError> {
        self.ensure_player_turn(player_id)?;

        let card = match self.draw() {
            Ok(card) => card,
            Err(err) => {
                self.abort_round();
                return Err(err.into());
            }
        };

        let Some(player) = self.registry.get_mut(player_id) else {
            return Err(ActionError::PlayerNotFound);
        };
        player.hand.add_card(card);

        let score = player.score();
        log::debug!("{} hits {} for {}", player.name, card, score);

        if score > 21 {
            player.status = PlayerStatus::Busted;
            player.message = String::from("BUST! You went over 21.");
            self.advance_turn();
        } else if score == 21 {
            player.status = PlayerStatus::Stood;
            player.message = String::from("21! Standing.");
            self.advance_turn();
        } else {
            player.message.clear();
        }

        Ok(card)
    }

    /// Player action: Stand (keep current hand).
    ///
    /// # Errors
    ///
    /// Returns an error if the table is not in the player turn phase, the
    /// player cannot be found, it is not their turn, or they are no longer
    /// playing.
    pub fn stand(&mut self, player_id: PlayerId) -> Result<(), ActionError> {
        self.ensure_player_turn(player_id)?;

        if let Some(player) = self.registry.get_mut(player_id) {
            player.status = PlayerStatus::Stood;
            player.message = format!("Stood on {}", player.score());
            log::debug!("{} stands on {}", player.name, player.score());
        }

        self.advance_turn();
        Ok(())
    }

    /// Auto-stands the player holding the turn and moves on.
    ///
    /// Used when the turn holder disconnects. Returns the forfeiting player,
    /// or `None` if nobody holds the turn.
    pub fn forfeit_current_turn(&mut self) -> Option<PlayerId> {
        let player_id = self.current_player()?;

        if let Some(player) = self.registry.get_mut(player_id) {
            player.status = PlayerStatus::Stood;
            player.message = String::from("Forfeited the turn.");
        }

        self.advance_turn();
        Some(player_id)
    }

    /// Passes the turn to the next player still playing.
    ///
    /// Players who stood, busted, hold blackjack, or have left are skipped.
    /// Running past the end of the turn order moves the table to the dealer
    /// turn. Outside the player turn phase this does nothing, so the dealer
    /// turn is entered at most once per round.
    pub fn advance_turn(&mut self) {
        if self.phase != Phase::PlayerTurn {
            return;
        }

        self.turn_index += 1;
        self.seek_active_turn();
    }

    /// Moves the turn index forward to the first player still playing,
    /// starting at the current index.
    pub(super) fn seek_active_turn(&mut self) {
        while let Some(&player_id) = self.turn_order.get(self.turn_index) {
            if let Some(player) = self.registry.get_mut(player_id) {
                if player.status == PlayerStatus::Playing {
                    player.message = String::from("It is your turn. Hit or Stand?");
                    return;
                }
            }
            self.turn_index += 1;
        }

        log::debug!("all players finished; dealer's turn");
        self.phase = Phase::DealerTurn;
    }
}

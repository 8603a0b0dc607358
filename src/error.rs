//! Error types for table operations.

use thiserror::Error;

/// The deck ran out of cards mid-round.
///
/// A single deck always covers a full table, so this signals a broken
/// invariant and aborts the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no cards left in the deck")]
pub struct DeckExhausted;

/// The operating system could not provide a seed for the shuffler.
#[cfg(feature = "std")]
#[derive(Debug, Error)]
#[error("operating system randomness unavailable: {0}")]
pub struct EntropyError(#[from] pub rand::rand_core::OsError);

/// Errors that can occur when a connection joins the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum JoinError {
    /// Every seat is taken.
    #[error("the table is full")]
    TableFull,
    /// The connection already has a player.
    #[error("connection already has a player")]
    AlreadyConnected,
}

/// Errors that can occur during betting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BetError {
    /// Player not found.
    #[error("player not found")]
    PlayerNotFound,
    /// Insufficient funds.
    #[error("insufficient funds")]
    InsufficientFunds,
    /// Invalid game state for betting.
    #[error("cannot place bet outside of the betting phase")]
    InvalidState,
    /// Bet amount is zero.
    #[error("bet amount is zero")]
    ZeroBet,
    /// The round could not be dealt and was aborted.
    #[error("no cards left in the deck")]
    DeckExhausted,
}

/// Errors that can occur during player actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Invalid game state for this action.
    #[error("the game is not in the player phase")]
    InvalidState,
    /// Not this player's turn.
    #[error("it is not your turn")]
    NotYourTurn,
    /// Player not found.
    #[error("player not found")]
    PlayerNotFound,
    /// The player has already finished acting this round.
    #[error("you are no longer playing this round")]
    NotPlaying,
    /// No cards left; the round was aborted.
    #[error("no cards left in the deck")]
    DeckExhausted,
}

/// Errors that can occur while the dealer plays and the round settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShowdownError {
    /// Invalid game state for this step.
    #[error("invalid game state for showdown")]
    InvalidState,
    /// No cards left; the round was aborted.
    #[error("no cards left in the deck")]
    DeckExhausted,
}

impl From<DeckExhausted> for BetError {
    fn from(_: DeckExhausted) -> Self {
        Self::DeckExhausted
    }
}

impl From<DeckExhausted> for ActionError {
    fn from(_: DeckExhausted) -> Self {
        Self::DeckExhausted
    }
}

impl From<DeckExhausted> for ShowdownError {
    fn from(_: DeckExhausted) -> Self {
        Self::DeckExhausted
    }
}

/// Why an action was refused without touching table state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalAction {
    /// The table is in the wrong phase for the action.
    #[error("the action is not allowed in the current phase")]
    WrongPhase,
    /// Another player holds the turn.
    #[error("it is not your turn")]
    NotYourTurn,
    /// The player already stood, busted or has blackjack.
    #[error("you are no longer playing this round")]
    NotPlaying,
    /// Bets must be positive.
    #[error("bet amount must be positive")]
    ZeroBet,
    /// The connection is already seated.
    #[error("connection already has a player")]
    AlreadyConnected,
}

/// Errors reported to a requester by the action gateway.
///
/// Everything except [`TableError::DeckExhausted`] is a local rejection that
/// leaves shared state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    /// Wrong phase, turn or status.
    #[error("{0}")]
    IllegalAction(IllegalAction),
    /// The bet exceeds the available balance.
    #[error("insufficient funds")]
    InsufficientFunds,
    /// The deck ran out and the round was aborted.
    #[error("no cards left in the deck; the round was aborted")]
    DeckExhausted,
    /// The connection has no player.
    #[error("unknown player")]
    UnknownPlayer,
    /// Every seat is taken.
    #[error("the table is full")]
    TableFull,
}

impl From<JoinError> for TableError {
    fn from(err: JoinError) -> Self {
        match err {
            JoinError::TableFull => Self::TableFull,
            JoinError::AlreadyConnected => Self::IllegalAction(IllegalAction::AlreadyConnected),
        }
    }
}

impl From<BetError> for TableError {
    fn from(err: BetError) -> Self {
        match err {
            BetError::PlayerNotFound => Self::UnknownPlayer,
            BetError::InsufficientFunds => Self::InsufficientFunds,
            BetError::InvalidState => Self::IllegalAction(IllegalAction::WrongPhase),
            BetError::ZeroBet => Self::IllegalAction(IllegalAction::ZeroBet),
            BetError::DeckExhausted => Self::DeckExhausted,
        }
    }
}

impl From<ActionError> for TableError {
    fn from(err: ActionError) -> Self {
        match err {
            ActionError::InvalidState => Self::IllegalAction(IllegalAction::WrongPhase),
            ActionError::NotYourTurn => Self::IllegalAction(IllegalAction::NotYourTurn),
            ActionError::PlayerNotFound => Self::UnknownPlayer,
            ActionError::NotPlaying => Self::IllegalAction(IllegalAction::NotPlaying),
            ActionError::DeckExhausted => Self::DeckExhausted,
        }
    }
}

use thiserror::Error;

use crate::cards::Card;
use crate::game::GameStatus;
use crate::player::PlayerId;

/// Malformed card text or an impossible card combination.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CardError {
    #[error("Invalid card format: {input:?}")]
    InvalidCardFormat { input: String },
    #[error("Duplicate card: {0}")]
    DuplicateCard(Card),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeckError {
    #[error("Insufficient cards: requested {requested}, remaining {remaining}")]
    InsufficientCards { requested: usize, remaining: usize },
    #[error("A deck must hold 52 unique cards (got {0})")]
    MalformedDeck(usize),
    #[error("Deck position {position} is past the last of {len} cards")]
    InvalidPosition { position: usize, len: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("Insufficient cards to evaluate: need at least 5, got {0}")]
    InsufficientCards(usize),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PotError {
    #[error("Main pot of {amount} has no declared winner")]
    UnassignedMainPot { amount: u64 },
    #[error("Side pot {side_pot} of {amount} has no declared winner")]
    UnassignedSidePot { side_pot: usize, amount: u64 },
    #[error("Invalid pot index {index} (only {pot_count} pots)")]
    InvalidPotIndex { index: usize, pot_count: usize },
    #[error("Player {player} is not eligible for pot {index}")]
    IneligibleWinner { player: PlayerId, index: usize },
}

/// Rule violations for a requested move. These are expected on the hot path and
/// are surfaced to callers as rejected moves.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("No betting round in progress (status {0})")]
    NotBettingRound(GameStatus),
    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("It's not player {actual}'s turn")]
    NotPlayersTurn { actual: PlayerId },
    #[error("Player {0} already folded")]
    PlayerFolded(PlayerId),
    #[error("Player {0} is already all-in")]
    PlayerAllIn(PlayerId),
    #[error("Player {0} is not active in this hand")]
    PlayerInactive(PlayerId),
    #[error("Cannot check: {to_call} to call")]
    CannotCheck { to_call: u32 },
    #[error("Nothing to call")]
    NothingToCall,
    #[error("Cannot bet: current bet is already {current_bet}, raise instead")]
    CannotBet { current_bet: u32 },
    #[error("Cannot raise: no bet to raise, bet instead")]
    CannotRaise,
    #[error("Invalid bet amount: {amount}, minimum: {minimum}")]
    BetBelowMinimum { amount: u32, minimum: u32 },
    #[error("Invalid raise amount: {amount}, minimum: {minimum}")]
    RaiseBelowMinimum { amount: u32, minimum: u32 },
    #[error("Insufficient chips: need {needed}, have {available}")]
    InsufficientChips { needed: u32, available: u32 },
    #[error("Cannot go all-in with zero chips")]
    NoChips,
}

/// A game snapshot that breaks an invariant, or a lifecycle step requested in the wrong status.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("Malformed game state: {0}")]
    Malformed(String),
    #[error("Invalid game state: {0}")]
    Invalid(String),
    #[error("Operation not allowed in status {0}")]
    WrongStatus(GameStatus),
    #[error("Betting round is not complete")]
    RoundIncomplete,
    #[error("Not enough players with chips to start a hand")]
    NotEnoughPlayers,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Any engine failure, for callers that drive several components with `?`.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Card(#[from] CardError),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Pot(#[from] PotError),
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

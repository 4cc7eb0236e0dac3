use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Hand;

/// Opaque player identifier supplied by the calling layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        PlayerId(s)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        PlayerId(s.to_string())
    }
}

/// Represents a player action during a betting round.
///
/// `Bet` and `Raise` carry the player's total bet for the round after the action
/// ("raise to"), not the increment.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "amount", rename_all = "snake_case")]
pub enum PlayerAction {
    /// Fold and forfeit the hand
    Fold,
    /// Check (no bet, only valid if nothing to call)
    Check,
    /// Call the current bet, or as much of it as the stack covers
    Call,
    /// Open the betting to the given amount
    Bet(u32),
    /// Raise the current bet to the given amount
    Raise(u32),
    /// Commit all remaining chips
    AllIn,
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::Fold => f.write_str("fold"),
            PlayerAction::Check => f.write_str("check"),
            PlayerAction::Call => f.write_str("call"),
            PlayerAction::Bet(n) => write!(f, "bet {n}"),
            PlayerAction::Raise(n) => write!(f, "raise to {n}"),
            PlayerAction::AllIn => f.write_str("all-in"),
        }
    }
}

/// A seated player's chips, wagers and hand status.
///
/// `is_active` means the player was dealt into the current hand and has not
/// folded; all-in players stay active but can no longer act.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Chips behind (not yet wagered)
    pub chips: u32,
    /// Chips wagered on the current street
    pub round_bet: u32,
    /// Chips wagered across the whole hand
    pub total_bet: u32,
    /// Hole cards, once dealt
    #[serde(default)]
    pub hole: Option<Hand>,
    pub is_active: bool,
    pub has_folded: bool,
    pub is_all_in: bool,
    /// Whether the player has voluntarily acted since the last bet or raise on this street
    #[serde(default)]
    pub has_acted: bool,
    /// Seat number at the table
    pub seat: usize,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, chips: u32, seat: usize) -> Self {
        Self {
            id: id.into(),
            chips,
            round_bet: 0,
            total_bet: 0,
            hole: None,
            is_active: false,
            has_folded: false,
            is_all_in: false,
            has_acted: false,
            seat,
        }
    }

    /// Still contesting the pot (dealt in and not folded).
    pub fn in_hand(&self) -> bool {
        self.is_active && !self.has_folded
    }

    /// Still able to take a betting action.
    pub fn can_act(&self) -> bool {
        self.in_hand() && !self.is_all_in
    }

    pub fn to_call(&self, current_bet: u32) -> u32 {
        current_bet.saturating_sub(self.round_bet)
    }

    /// Moves chips from the stack into the current wager, capped at the stack.
    /// Returns the amount actually committed.
    pub(crate) fn commit(&mut self, amount: u32) -> u32 {
        let paid = amount.min(self.chips);
        self.chips -= paid;
        self.round_bet += paid;
        self.total_bet += paid;
        if self.chips == 0 && self.is_active {
            self.is_all_in = true;
        }
        paid
    }

    pub(crate) fn fold(&mut self) {
        self.has_folded = true;
        self.is_active = false;
    }

    /// Clears per-hand state ahead of a new deal; zero-chip players sit out.
    pub(crate) fn reset_for_hand(&mut self) {
        self.round_bet = 0;
        self.total_bet = 0;
        self.hole = None;
        self.has_folded = false;
        self.is_all_in = false;
        self.has_acted = false;
        self.is_active = self.chips > 0;
    }
}

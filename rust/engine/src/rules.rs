//! Pre-flight legality checks for player actions.
//!
//! Nothing here mutates state: [`check_action`] and [`validate_action`] only read
//! the snapshot, so a rejected move leaves the caller's state untouched.

use serde::{Deserialize, Serialize};

use crate::errors::ActionError;
use crate::game::GameState;
use crate::player::{PlayerAction as A, PlayerId};

/// Outcome of validating a requested action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    /// Human-readable rejection reason, `None` when valid
    pub reason: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn rejected(err: &ActionError) -> Self {
        Self {
            valid: false,
            reason: Some(err.to_string()),
        }
    }
}

/// Validates a player action against the current snapshot.
///
/// # Examples
///
/// ```
/// use holdem_engine::game::GameState;
/// use holdem_engine::player::{Player, PlayerAction, PlayerId};
/// use holdem_engine::rules::validate_action;
///
/// let players = vec![Player::new("a", 1_000, 0), Player::new("b", 1_000, 1)];
/// let state = GameState::new(players, 5, 10).unwrap();
///
/// // No hand has started, so nobody may act yet
/// let result = validate_action(&state, &PlayerId::from("a"), PlayerAction::Check);
/// assert!(!result.valid);
/// assert!(result.reason.is_some());
/// ```
pub fn validate_action(state: &GameState, player_id: &PlayerId, action: A) -> ValidationResult {
    match check_action(state, player_id, action) {
        Ok(_) => ValidationResult::ok(),
        Err(e) => ValidationResult::rejected(&e),
    }
}

/// Like [`validate_action`] but returns the acting player's index on success and
/// the structured rule violation on failure.
pub fn check_action(
    state: &GameState,
    player_id: &PlayerId,
    action: A,
) -> Result<usize, ActionError> {
    if !state.status.is_betting_round() {
        return Err(ActionError::NotBettingRound(state.status));
    }
    let idx = state
        .player_index(player_id)
        .ok_or_else(|| ActionError::UnknownPlayer(player_id.clone()))?;
    let p = &state.players[idx];
    if p.has_folded {
        return Err(ActionError::PlayerFolded(p.id.clone()));
    }
    if p.is_all_in {
        return Err(ActionError::PlayerAllIn(p.id.clone()));
    }
    if !p.is_active {
        return Err(ActionError::PlayerInactive(p.id.clone()));
    }
    if state.current_player != Some(idx) {
        return Err(ActionError::NotPlayersTurn {
            actual: p.id.clone(),
        });
    }

    let to_call = p.to_call(state.current_bet);
    match action {
        A::Fold => {}
        A::Check => {
            if to_call > 0 {
                return Err(ActionError::CannotCheck { to_call });
            }
        }
        A::Call => {
            if to_call == 0 {
                return Err(ActionError::NothingToCall);
            }
        }
        A::Bet(amount) => {
            if state.current_bet > 0 {
                return Err(ActionError::CannotBet {
                    current_bet: state.current_bet,
                });
            }
            if amount < state.big_blind {
                return Err(ActionError::BetBelowMinimum {
                    amount,
                    minimum: state.big_blind,
                });
            }
            ensure_covered(amount.saturating_sub(p.round_bet), p.chips)?;
        }
        A::Raise(amount) => {
            if state.current_bet == 0 {
                return Err(ActionError::CannotRaise);
            }
            let minimum = state.min_raise_to();
            if amount < minimum {
                return Err(ActionError::RaiseBelowMinimum { amount, minimum });
            }
            ensure_covered(amount.saturating_sub(p.round_bet), p.chips)?;
        }
        A::AllIn => {
            if p.chips == 0 {
                return Err(ActionError::NoChips);
            }
        }
    }
    Ok(idx)
}

fn ensure_covered(needed: u32, available: u32) -> Result<(), ActionError> {
    if needed > available {
        Err(ActionError::InsufficientChips { needed, available })
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
}

/// A move currently open to the acting player. Amounts are "to" amounts for the
/// round, matching [`crate::player::PlayerAction::Bet`] and `Raise`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalAction {
    pub kind: ActionKind,
    pub min_amount: Option<u32>,
    pub max_amount: Option<u32>,
}

impl LegalAction {
    fn plain(kind: ActionKind) -> Self {
        Self {
            kind,
            min_amount: None,
            max_amount: None,
        }
    }

    fn ranged(kind: ActionKind, min: u32, max: u32) -> Self {
        Self {
            kind,
            min_amount: Some(min),
            max_amount: Some(max),
        }
    }
}

/// Every action `player_id` may take right now; empty when it is not their turn.
pub fn legal_actions(state: &GameState, player_id: &PlayerId) -> Vec<LegalAction> {
    let Ok(idx) = check_action(state, player_id, A::Fold) else {
        return Vec::new();
    };
    let p = &state.players[idx];
    let to_call = p.to_call(state.current_bet);
    let all_in_to = p.round_bet + p.chips;

    let mut actions = vec![LegalAction::plain(ActionKind::Fold)];
    if to_call == 0 {
        actions.push(LegalAction::plain(ActionKind::Check));
    } else {
        let call_to = p.round_bet + to_call.min(p.chips);
        actions.push(LegalAction::ranged(ActionKind::Call, call_to, call_to));
    }
    if state.current_bet == 0 {
        if all_in_to >= state.big_blind {
            actions.push(LegalAction::ranged(ActionKind::Bet, state.big_blind, all_in_to));
        }
    } else {
        let min = state.min_raise_to();
        if all_in_to >= min {
            actions.push(LegalAction::ranged(ActionKind::Raise, min, all_in_to));
        }
    }
    actions.push(LegalAction::ranged(ActionKind::AllIn, all_in_to, all_in_to));
    actions
}

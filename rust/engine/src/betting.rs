//! Betting-round state machine.
//!
//! [`apply_action`] validates a move with [`crate::rules::check_action`], then
//! returns the next snapshot: chips moved, pot rebuilt from contributions, and the
//! turn handed to the next player who can act.

use tracing::debug;

use crate::errors::ActionError;
use crate::game::GameState;
use crate::player::{PlayerAction as A, PlayerId};
use crate::pot::calculate_pot;
use crate::rules::check_action;

/// Applies one action and returns the resulting state. The input is never modified.
pub fn apply_action(
    state: &GameState,
    player_id: &PlayerId,
    action: A,
) -> Result<GameState, ActionError> {
    let idx = check_action(state, player_id, action)?;
    let mut next = state.clone();
    let current_bet = next.current_bet;
    let p = &mut next.players[idx];

    let mut reopened = false;
    match action {
        A::Fold => p.fold(),
        A::Check => {}
        A::Call => {
            let owed = p.to_call(current_bet);
            p.commit(owed);
        }
        A::Bet(amount) | A::Raise(amount) => {
            let owed = amount.saturating_sub(p.round_bet);
            p.commit(owed);
            next.current_bet = p.round_bet;
            reopened = true;
        }
        A::AllIn => {
            let stack = p.chips;
            p.commit(stack);
            // short of the current bet this is a call for less
            if p.round_bet > current_bet {
                next.current_bet = p.round_bet;
                reopened = true;
            }
        }
    }
    next.players[idx].has_acted = true;
    if reopened {
        for (i, other) in next.players.iter_mut().enumerate() {
            if i != idx {
                other.has_acted = false;
            }
        }
    }

    next.pot = calculate_pot(&next.contributions());
    next.current_player = if is_round_complete(&next) {
        None
    } else {
        next_actor(&next, idx)
    };

    debug!(
        hand = next.hand_number,
        street = %next.status,
        player = %player_id,
        %action,
        current_bet = next.current_bet,
        pot = next.pot.total(),
        "action applied"
    );
    Ok(next)
}

/// Next player after `from`, cyclically, who can still act (not folded, not all-in).
pub fn next_actor(state: &GameState, from: usize) -> Option<usize> {
    let n = state.players.len();
    (1..=n)
        .map(|step| (from + step) % n)
        .find(|&i| state.players[i].can_act())
}

/// True once the street needs no more actions: at most one player remains, nobody
/// can act, or everyone who can act has acted and matched the current bet.
///
/// A lone player who can still act while everyone else is all-in has nobody to bet
/// against, so they only need to act when facing a bet.
pub fn is_round_complete(state: &GameState) -> bool {
    if state.players_in_hand().count() <= 1 {
        return true;
    }
    let actors: Vec<_> = state.players.iter().filter(|p| p.can_act()).collect();
    match actors.as_slice() {
        [] => true,
        [lone] => lone.round_bet >= state.current_bet,
        _ => actors
            .iter()
            .all(|p| p.has_acted && p.round_bet == state.current_bet),
    }
}

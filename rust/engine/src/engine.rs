//! Hand lifecycle: dealing, blinds and street transitions.
//!
//! Like the betting reducer these functions take a snapshot (and the deck for the
//! hand) and return new values; the caller owns both between calls.
//!
//! # Examples
//!
//! ```
//! use holdem_engine::deck::Deck;
//! use holdem_engine::engine::{advance_street, start_hand};
//! use holdem_engine::betting::apply_action;
//! use holdem_engine::game::{GameState, GameStatus};
//! use holdem_engine::player::{Player, PlayerAction};
//! use holdem_engine::rng::SeededRandom;
//!
//! let players = vec![Player::new("a", 1_000, 0), Player::new("b", 1_000, 1)];
//! let state = GameState::new(players, 5, 10).unwrap();
//! let deck = Deck::new().shuffled(&mut SeededRandom::new(12345));
//!
//! let (state, deck) = start_hand(&state, &deck).unwrap();
//! assert_eq!(state.status, GameStatus::Preflop);
//!
//! // Heads-up: the dealer posts the small blind and acts first preflop
//! let dealer = state.players[state.dealer_index].id.clone();
//! let state = apply_action(&state, &dealer, PlayerAction::Call).unwrap();
//! let big_blind = state.current_actor().unwrap().id.clone();
//! let state = apply_action(&state, &big_blind, PlayerAction::Check).unwrap();
//!
//! let (state, _deck) = advance_street(&state, &deck).unwrap();
//! assert_eq!(state.status, GameStatus::Flop);
//! assert_eq!(state.community_cards.len(), 3);
//! ```

use tracing::{debug, info};

use crate::betting::{is_round_complete, next_actor};
use crate::cards::Hand;
use crate::deck::Deck;
use crate::errors::{GameError, StateError};
use crate::game::{GameState, GameStatus};
use crate::pot::calculate_pot;

/// Starts the next hand: deals hole cards, posts blinds and opens preflop betting.
pub fn start_hand(state: &GameState, deck: &Deck) -> Result<(GameState, Deck), GameError> {
    if !matches!(state.status, GameStatus::Waiting | GameStatus::Complete) {
        return Err(StateError::WrongStatus(state.status).into());
    }
    let mut next = state.clone();
    for p in &mut next.players {
        p.reset_for_hand();
    }
    let seated = next.players.iter().filter(|p| p.is_active).count();
    if seated < 2 {
        return Err(StateError::NotEnoughPlayers.into());
    }

    next.status = GameStatus::Dealing;
    next.hand_number += 1;
    next.community_cards.clear();
    next.current_bet = 0;
    next.current_player = None;
    if !next.players[next.dealer_index].is_active {
        next.dealer_index = next_seated(&next, next.dealer_index);
    }

    // one card at a time, starting left of the dealer
    let order = seated_order(&next, next.dealer_index);
    let mut deck = deck.clone();
    let mut holes = vec![Vec::with_capacity(2); next.players.len()];
    for _ in 0..2 {
        for &i in &order {
            let (rest, card) = deck.deal(1)?;
            deck = rest;
            holes[i].extend(card);
        }
    }
    for &i in &order {
        next.players[i].hole = Some(Hand::new(holes[i][0], holes[i][1])?);
    }

    let (sb, bb) = if seated == 2 {
        (next.dealer_index, next_seated(&next, next.dealer_index))
    } else {
        let sb = next_seated(&next, next.dealer_index);
        (sb, next_seated(&next, sb))
    };
    let small_blind = next.small_blind;
    let big_blind = next.big_blind;
    next.players[sb].commit(small_blind);
    next.players[bb].commit(big_blind);
    next.current_bet = big_blind;
    next.pot = calculate_pot(&next.contributions());

    next.status = GameStatus::Preflop;
    next.current_player = if is_round_complete(&next) {
        None
    } else {
        next_actor(&next, bb)
    };

    info!(
        hand = next.hand_number,
        players = seated,
        dealer = %next.players[next.dealer_index].id,
        small_blind = %next.players[sb].id,
        big_blind = %next.players[bb].id,
        "hand started"
    );
    Ok((next, deck))
}

/// Closes a finished betting round and deals the next street.
///
/// From the river, or once a single player remains, the hand moves to
/// [`GameStatus::Showdown`] without dealing.
pub fn advance_street(state: &GameState, deck: &Deck) -> Result<(GameState, Deck), GameError> {
    if !state.status.is_betting_round() {
        return Err(StateError::WrongStatus(state.status).into());
    }
    if !is_round_complete(state) {
        return Err(StateError::RoundIncomplete.into());
    }

    let mut next = state.clone();
    for p in &mut next.players {
        p.round_bet = 0;
        p.has_acted = false;
    }
    next.current_bet = 0;
    next.current_player = None;

    let contested = next.players_in_hand().count() > 1;
    let street = match next.status.next() {
        Some(s) if contested => s,
        _ => GameStatus::Showdown,
    };
    if street == GameStatus::Showdown {
        next.status = GameStatus::Showdown;
        debug!(hand = next.hand_number, "betting closed");
        return Ok((next, deck.clone()));
    }

    let count = match street {
        GameStatus::Flop => 3,
        _ => 1,
    };
    let (deck, cards) = deck.burn()?.deal(count)?;
    next.community_cards.extend(cards);
    next.status = street;
    next.current_player = next_actor(&next, next.dealer_index);
    // every remaining player may already be all-in
    if is_round_complete(&next) {
        next.current_player = None;
    }

    let board: Vec<String> = next.community_cards.iter().map(ToString::to_string).collect();
    debug!(hand = next.hand_number, %street, board = %board.join(" "), "street dealt");
    Ok((next, deck))
}

/// Moves the dealer button to the next player with chips, between hands.
pub fn rotate_dealer(state: &GameState) -> Result<GameState, StateError> {
    if !matches!(state.status, GameStatus::Waiting | GameStatus::Complete) {
        return Err(StateError::WrongStatus(state.status));
    }
    let mut next = state.clone();
    let n = next.players.len();
    next.dealer_index = (1..=n)
        .map(|step| (state.dealer_index + step) % n)
        .find(|&i| state.players[i].chips > 0)
        .unwrap_or(state.dealer_index);
    Ok(next)
}

fn next_seated(state: &GameState, from: usize) -> usize {
    let n = state.players.len();
    (1..=n)
        .map(|step| (from + step) % n)
        .find(|&i| state.players[i].is_active)
        .unwrap_or(from)
}

/// Dealt-in players, starting left of `dealer` and ending with the dealer.
fn seated_order(state: &GameState, dealer: usize) -> Vec<usize> {
    let n = state.players.len();
    (1..=n)
        .map(|step| (dealer + step) % n)
        .filter(|&i| state.players[i].is_active)
        .collect()
}

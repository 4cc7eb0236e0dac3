use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::config::TableConfig;
use crate::errors::StateError;
use crate::player::{Player, PlayerId};
use crate::pot::{Contribution, Pot};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 10;

/// Phase of a hand. Transitions only move forward through the listed order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Waiting,
    Dealing,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    Complete,
}

impl GameStatus {
    pub fn next(self) -> Option<GameStatus> {
        use GameStatus::*;
        match self {
            Waiting => Some(Dealing),
            Dealing => Some(Preflop),
            Preflop => Some(Flop),
            Flop => Some(Turn),
            Turn => Some(River),
            River => Some(Showdown),
            Showdown => Some(Complete),
            Complete => None,
        }
    }

    /// True on the four streets where players bet.
    pub fn is_betting_round(self) -> bool {
        matches!(
            self,
            GameStatus::Preflop | GameStatus::Flop | GameStatus::Turn | GameStatus::River
        )
    }

    /// Community cards showing once this street is dealt.
    pub fn board_size(self) -> Option<usize> {
        match self {
            GameStatus::Waiting | GameStatus::Dealing | GameStatus::Preflop => Some(0),
            GameStatus::Flop => Some(3),
            GameStatus::Turn => Some(4),
            GameStatus::River => Some(5),
            // a hand can end before the river
            GameStatus::Showdown | GameStatus::Complete => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameStatus::Waiting => "WAITING",
            GameStatus::Dealing => "DEALING",
            GameStatus::Preflop => "PREFLOP",
            GameStatus::Flop => "FLOP",
            GameStatus::Turn => "TURN",
            GameStatus::River => "RIVER",
            GameStatus::Showdown => "SHOWDOWN",
            GameStatus::Complete => "COMPLETE",
        };
        f.write_str(s)
    }
}

/// Snapshot of one table for one hand.
///
/// The engine never keeps a `GameState`: every operation borrows a snapshot and
/// returns a new one, leaving ownership with the calling layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub status: GameStatus,
    /// Players in seating order
    pub players: Vec<Player>,
    pub pot: Pot,
    #[serde(default)]
    pub community_cards: Vec<Card>,
    /// Highest round bet on the current street
    pub current_bet: u32,
    pub dealer_index: usize,
    /// Index of the player to act, `None` when nobody can act
    pub current_player: Option<usize>,
    pub hand_number: u64,
    pub small_blind: u32,
    pub big_blind: u32,
}

impl GameState {
    pub fn new(
        players: Vec<Player>,
        small_blind: u32,
        big_blind: u32,
    ) -> Result<Self, StateError> {
        let state = Self {
            status: GameStatus::Waiting,
            players,
            pot: Pot::default(),
            community_cards: Vec::with_capacity(5),
            current_bet: 0,
            dealer_index: 0,
            current_player: None,
            hand_number: 0,
            small_blind,
            big_blind,
        };
        state.validate()?;
        Ok(state)
    }

    /// Seats one player per id, in order, with the configured stack and blinds.
    pub fn from_config(config: &TableConfig, ids: &[PlayerId]) -> Result<Self, StateError> {
        if ids.len() > config.max_seats {
            return Err(StateError::Invalid(format!(
                "{} players exceed {} seats",
                ids.len(),
                config.max_seats
            )));
        }
        let players = ids
            .iter()
            .enumerate()
            .map(|(seat, id)| Player::new(id.clone(), config.starting_stack, seat))
            .collect();
        Self::new(players, config.small_blind, config.big_blind)
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn player_index(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == id)
    }

    pub fn current_actor(&self) -> Option<&Player> {
        self.current_player.and_then(|i| self.players.get(i))
    }

    /// Players still contesting the pot.
    pub fn players_in_hand(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.in_hand())
    }

    /// Each player's chips committed this hand, for pot construction.
    pub fn contributions(&self) -> Vec<Contribution> {
        self.players.iter().map(Contribution::from_player).collect()
    }

    /// Smallest legal "raise to" amount on this street.
    pub fn min_raise_to(&self) -> u32 {
        self.current_bet + self.current_bet.max(self.big_blind)
    }

    /// Checks the invariants a snapshot must hold, e.g. after crossing a
    /// serialization boundary.
    pub fn validate(&self) -> Result<(), StateError> {
        let invalid = |msg: String| Err(StateError::Invalid(msg));

        if self.small_blind == 0 || self.big_blind == 0 {
            return invalid("blinds must be positive".into());
        }
        if self.small_blind > self.big_blind {
            return invalid(format!(
                "small blind {} exceeds big blind {}",
                self.small_blind, self.big_blind
            ));
        }
        let n = self.players.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&n) {
            return invalid(format!("{n} players (need {MIN_PLAYERS}..={MAX_PLAYERS})"));
        }
        if self.dealer_index >= n {
            return invalid(format!("dealer index {} out of range", self.dealer_index));
        }
        if let Some(i) = self.current_player {
            if i >= n {
                return invalid(format!("current player {i} out of range"));
            }
        }

        let mut ids = HashSet::new();
        let mut seats = HashSet::new();
        let mut cards = HashSet::new();
        for p in &self.players {
            if !ids.insert(&p.id) {
                return invalid(format!("duplicate player id {}", p.id));
            }
            if !seats.insert(p.seat) {
                return invalid(format!("duplicate seat {}", p.seat));
            }
            if p.round_bet > p.total_bet {
                return invalid(format!("player {} round bet exceeds total bet", p.id));
            }
            if p.has_folded && p.is_active {
                return invalid(format!("player {} is folded but active", p.id));
            }
            for c in p.hole.iter().flat_map(|h| h.cards()) {
                if !cards.insert(c) {
                    return invalid(format!("card {c} appears twice"));
                }
            }
        }
        for &c in &self.community_cards {
            if !cards.insert(c) {
                return invalid(format!("card {c} appears twice"));
            }
        }

        // any single stack or wager can hold every chip at the table
        let in_play: u64 = self
            .players
            .iter()
            .map(|p| u64::from(p.chips) + u64::from(p.total_bet))
            .sum();
        if in_play > u64::from(u32::MAX) {
            return invalid(format!("{in_play} chips in play exceed {}", u32::MAX));
        }

        if self.status.is_betting_round() {
            let highest = self.players.iter().map(|p| p.round_bet).max().unwrap_or(0);
            if highest > self.current_bet {
                return invalid(format!(
                    "round bet {highest} exceeds current bet {}",
                    self.current_bet
                ));
            }
            // a short big blind still sets the preflop bet
            let expected = match self.status {
                GameStatus::Preflop => highest.max(self.big_blind),
                _ => highest,
            };
            if self.current_bet != expected {
                return invalid(format!(
                    "current bet {} does not match highest round bet {highest}",
                    self.current_bet
                ));
            }
        }

        let board = self.community_cards.len();
        match self.status.board_size() {
            Some(expected) if expected != board => {
                return invalid(format!(
                    "{board} community cards during {}",
                    self.status
                ));
            }
            None if !matches!(board, 0 | 3 | 4 | 5) => {
                return invalid(format!("{board} community cards"));
            }
            _ => {}
        }

        if self.status != GameStatus::Complete {
            let committed: u64 = self.players.iter().map(|p| u64::from(p.total_bet)).sum();
            if self.pot.total() != committed {
                return invalid(format!(
                    "pot {} does not match contributions {committed}",
                    self.pot.total()
                ));
            }
        }
        Ok(())
    }

    pub fn from_json(s: &str) -> Result<Self, StateError> {
        let state: GameState =
            serde_json::from_str(s).map_err(|e| StateError::Malformed(e.to_string()))?;
        if let Err(e) = state.validate() {
            tracing::warn!(error = %e, hand = state.hand_number, "rejected game state");
            return Err(e);
        }
        Ok(state)
    }

    pub fn to_json(&self) -> Result<String, StateError> {
        serde_json::to_string(self).map_err(|e| StateError::Malformed(e.to_string()))
    }
}

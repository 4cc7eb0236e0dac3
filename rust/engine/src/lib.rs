//! # holdem-engine: No-Limit Texas Hold'em rules core
//!
//! The authoritative rules for a single hand: cards, dealing, hand ranking,
//! main/side pots, and the betting-round state machine. The engine is a set of pure
//! functions over plain data; it owns no state between calls and performs no I/O.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card, Rank, Suit and hole-card `Hand`, with the compact text form ("As", "Td")
//! - [`rng`] - Seeded and OS-seeded randomness sources, Fisher-Yates shuffle
//! - [`deck`] - 52-card deck with a dealing cursor
//! - [`hand`] - Five-card ranking and best-of-seven search
//! - [`pot`] - Main/side pot construction and chip distribution
//! - [`game`] - `GameState` snapshot, status order, validity predicate
//! - [`rules`] - Action legality checks and legal action listing
//! - [`betting`] - Applying actions, turn order, round completion
//! - [`engine`] - Hand start, blinds, street advancement
//! - [`showdown`] - Ranking remaining hands and paying out pots
//! - [`config`] - Table configuration from defaults, TOML and environment
//! - [`errors`] - Error types for every component
//!
//! ## Quick Start
//!
//! ```rust
//! use holdem_engine::cards::parse_cards;
//! use holdem_engine::hand::{find_best_hand, HandCategory};
//!
//! let cards = parse_cards("Ah Kh Qh Jh Th 2c 3d").unwrap();
//! let best = find_best_hand(&cards).unwrap();
//! assert_eq!(best.category, HandCategory::RoyalFlush);
//! ```
//!
//! ## Deterministic Shuffles
//!
//! ```rust
//! use holdem_engine::deck::Deck;
//! use holdem_engine::rng::SeededRandom;
//!
//! let a = Deck::new().shuffled(&mut SeededRandom::new(42));
//! let b = Deck::new().shuffled(&mut SeededRandom::new(42));
//! assert_eq!(a, b);
//! ```
//!
//! ## Side Pots
//!
//! ```rust
//! use holdem_engine::pot::{calculate_pot, Contribution};
//!
//! let pot = calculate_pot(&[
//!     Contribution::new("p1", 30, true),
//!     Contribution::new("p2", 60, true),
//!     Contribution::new("p3", 100, false),
//!     Contribution::new("p4", 100, false),
//! ]);
//! assert_eq!(pot.main.amount, 120);
//! assert_eq!(pot.side_pots[0].amount, 90);
//! assert_eq!(pot.side_pots[1].amount, 80);
//! ```

pub mod betting;
pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod hand;
pub mod player;
pub mod pot;
pub mod rng;
pub mod rules;
pub mod showdown;

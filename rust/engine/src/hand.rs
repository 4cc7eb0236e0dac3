use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Hand, Rank};
use crate::errors::EvalError;

/// The ten hand categories, weakest first.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl HandCategory {
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::OnePair => "Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
            HandCategory::RoyalFlush => "Royal Flush",
        }
    }
}

/// Result of ranking a five-card hand.
///
/// `value` orders any two evaluations with a single integer comparison: the
/// category occupies the top base-16 digit and the five tie-break ranks fill the
/// digits below it, most significant first.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandEvaluation {
    pub category: HandCategory,
    pub value: u32,
    pub description: String,
    /// The five cards making the hand, most significant first
    pub cards: [Card; 5],
}

const DIGIT: u32 = 16;
const CATEGORY_WEIGHT: u32 = DIGIT.pow(5);

/// Ranks exactly five cards.
pub fn evaluate_five(cards: &[Card; 5]) -> HandEvaluation {
    let mut rank_counts = [0u8; 15]; // 2..14 used
    let mut rank_mask: u16 = 0;
    for c in cards {
        rank_counts[c.rank.value() as usize] += 1;
        rank_mask |= 1 << c.rank.value();
    }
    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let straight_high = straight_high_from_mask(rank_mask);

    // (count, rank) groups, biggest group first, higher rank breaking ties
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .rev()
        .filter(|&r| rank_counts[r as usize] > 0)
        .map(|r| (rank_counts[r as usize], r))
        .collect();
    groups.sort_by(|a, b| b.cmp(a));
    let shape: Vec<u8> = groups.iter().map(|&(n, _)| n).collect();
    let by_group: Vec<u8> = groups.iter().map(|&(_, r)| r).collect();

    let category = match (straight_high, is_flush, shape.as_slice()) {
        (Some(14), true, _) => HandCategory::RoyalFlush,
        (Some(_), true, _) => HandCategory::StraightFlush,
        (_, _, [4, 1]) => HandCategory::FourOfAKind,
        (_, _, [3, 2]) => HandCategory::FullHouse,
        (_, true, _) => HandCategory::Flush,
        (Some(_), false, _) => HandCategory::Straight,
        (_, _, [3, ..]) => HandCategory::ThreeOfAKind,
        (_, _, [2, 2, ..]) => HandCategory::TwoPair,
        (_, _, [2, ..]) => HandCategory::OnePair,
        _ => HandCategory::HighCard,
    };
    let kickers = match (straight_high, category) {
        (
            Some(high),
            HandCategory::Straight | HandCategory::StraightFlush | HandCategory::RoyalFlush,
        ) => vec![high],
        _ => by_group,
    };

    let value = kickers
        .iter()
        .chain(std::iter::repeat(&0))
        .take(5)
        .fold(category as u32, |acc, &k| acc * DIGIT + k as u32);
    debug_assert!(value < CATEGORY_WEIGHT * 10);

    let ordered = order_cards(cards, &rank_counts, straight_high == Some(5));
    HandEvaluation {
        category,
        value,
        description: describe(category, &kickers),
        cards: ordered,
    }
}

/// Best five-card hand among `cards` (normally 2 hole cards plus up to 5 on the board).
///
/// Every 5-card subset is evaluated and the one with the highest value wins; with
/// 7 cards that is 21 subsets.
pub fn find_best_hand(cards: &[Card]) -> Result<HandEvaluation, EvalError> {
    let n = cards.len();
    if n < 5 {
        return Err(EvalError::InsufficientCards(n));
    }
    let mut best: Option<HandEvaluation> = None;
    for a in 0..n {
        for b in a + 1..n {
            for c in b + 1..n {
                for d in c + 1..n {
                    for e in d + 1..n {
                        let eval =
                            evaluate_five(&[cards[a], cards[b], cards[c], cards[d], cards[e]]);
                        if best.as_ref().map_or(true, |cur| eval.value > cur.value) {
                            best = Some(eval);
                        }
                    }
                }
            }
        }
    }
    best.ok_or(EvalError::InsufficientCards(n))
}

/// Best hand for a player's hole cards plus the community board.
pub fn evaluate_hand(hole: &Hand, board: &[Card]) -> Result<HandEvaluation, EvalError> {
    let mut cards = Vec::with_capacity(2 + board.len());
    cards.extend_from_slice(&hole.cards());
    cards.extend_from_slice(board);
    find_best_hand(&cards)
}

pub fn compare_hands(a: &HandEvaluation, b: &HandEvaluation) -> Ordering {
    a.value.cmp(&b.value)
}

/// Indices of every evaluation tied for the best value.
pub fn determine_winners(hands: &[HandEvaluation]) -> Vec<usize> {
    let Some(best) = hands.iter().map(|h| h.value).max() else {
        return vec![];
    };
    hands
        .iter()
        .enumerate()
        .filter(|(_, h)| h.value == best)
        .map(|(i, _)| i)
        .collect()
}

fn straight_high_from_mask(mask: u16) -> Option<u8> {
    let mut m = mask;
    // Ace also plays low
    if (m & (1 << 14)) != 0 {
        m |= 1 << 1;
    }
    // Sliding 5-bit window from Ace(14) down to 5
    (5..=14u8).rev().find(|&high| {
        let window = 0b11111u16 << (high - 4);
        (m & window) == window
    })
}

fn order_cards(cards: &[Card; 5], rank_counts: &[u8; 15], wheel: bool) -> [Card; 5] {
    let mut ordered = *cards;
    let key = |c: &Card| {
        let r = c.rank.value();
        let r = if wheel && r == 14 { 1 } else { r };
        (rank_counts[c.rank.value() as usize], r, c.suit)
    };
    ordered.sort_by(|a, b| key(b).cmp(&key(a)));
    ordered
}

fn describe(category: HandCategory, kickers: &[u8]) -> String {
    let rank = |i: usize| {
        kickers
            .get(i)
            .and_then(|&v| Rank::from_u8(v))
            .unwrap_or(Rank::Two)
    };
    match category {
        HandCategory::RoyalFlush => "Royal Flush".to_string(),
        HandCategory::StraightFlush => format!("Straight Flush, {} high", rank(0).name()),
        HandCategory::FourOfAKind => format!("Four of a Kind, {}", rank(0).plural()),
        HandCategory::FullHouse => {
            format!("Full House, {} over {}", rank(0).plural(), rank(1).plural())
        }
        HandCategory::Flush => format!("Flush, {} high", rank(0).name()),
        HandCategory::Straight => format!("Straight, {} high", rank(0).name()),
        HandCategory::ThreeOfAKind => format!("Three of a Kind, {}", rank(0).plural()),
        HandCategory::TwoPair => {
            format!("Two Pair, {} and {}", rank(0).plural(), rank(1).plural())
        }
        HandCategory::OnePair => format!("Pair of {}", rank(0).plural()),
        HandCategory::HighCard => format!("High Card, {}", rank(0).name()),
    }
}

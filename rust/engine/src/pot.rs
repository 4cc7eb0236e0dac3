//! Main/side pot construction and chip distribution.

use serde::{Deserialize, Serialize};

use crate::errors::PotError;
use crate::player::{Player, PlayerId};

/// Chips one player has put into the pot this hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub player_id: PlayerId,
    pub amount: u32,
    pub is_all_in: bool,
    /// Folded chips still count toward the pots but win none of them
    #[serde(default)]
    pub has_folded: bool,
}

impl Contribution {
    pub fn new(player_id: impl Into<PlayerId>, amount: u32, is_all_in: bool) -> Self {
        Self {
            player_id: player_id.into(),
            amount,
            is_all_in,
            has_folded: false,
        }
    }

    pub fn folded(mut self) -> Self {
        self.has_folded = true;
        self
    }

    pub fn from_player(p: &Player) -> Self {
        Self {
            player_id: p.id.clone(),
            amount: p.total_bet,
            is_all_in: p.is_all_in,
            has_folded: p.has_folded,
        }
    }
}

/// One tier of the pot and the players who can win it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotTier {
    pub amount: u64,
    pub eligible: Vec<PlayerId>,
}

/// The main pot plus side pots in ascending threshold order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    pub main: PotTier,
    #[serde(default)]
    pub side_pots: Vec<PotTier>,
}

impl Pot {
    pub fn total(&self) -> u64 {
        self.main.amount + self.side_pots.iter().map(|p| p.amount).sum::<u64>()
    }

    /// Number of pots including the main pot.
    pub fn pot_count(&self) -> usize {
        1 + self.side_pots.len()
    }

    /// Pot by index: 0 is the main pot, `i` is side pot `i - 1`.
    pub fn tier(&self, index: usize) -> Option<&PotTier> {
        match index {
            0 => Some(&self.main),
            i => self.side_pots.get(i - 1),
        }
    }

    /// Players who can win pot `index`.
    pub fn eligible(&self, index: usize) -> Option<&[PlayerId]> {
        self.tier(index).map(|t| t.eligible.as_slice())
    }

    pub fn tiers(&self) -> impl Iterator<Item = &PotTier> {
        std::iter::once(&self.main).chain(self.side_pots.iter())
    }
}

/// Builds the main pot and side pots from per-player contributions.
///
/// Without any all-in every chip goes to a single main pot. Otherwise each distinct
/// contribution level `L` above the previous level `P` forms a tier worth
/// `(L - P) * |{amount >= L}|`, winnable by the non-folded players who reached `L`.
/// Tier amounts are `u64` so any number of full `u32` stacks sums without overflow.
pub fn calculate_pot(contributions: &[Contribution]) -> Pot {
    let live: Vec<&Contribution> = contributions.iter().filter(|c| c.amount > 0).collect();
    let eligible_at = |level: u32| -> Vec<PlayerId> {
        live.iter()
            .filter(|c| c.amount >= level && !c.has_folded)
            .map(|c| c.player_id.clone())
            .collect()
    };

    if !live.iter().any(|c| c.is_all_in) {
        return Pot {
            main: PotTier {
                amount: live.iter().map(|c| u64::from(c.amount)).sum(),
                eligible: eligible_at(1),
            },
            side_pots: vec![],
        };
    }

    let mut levels: Vec<u32> = live.iter().map(|c| c.amount).collect();
    levels.sort_unstable();
    levels.dedup();

    let mut tiers: Vec<PotTier> = Vec::with_capacity(levels.len());
    let mut previous = 0;
    for level in levels {
        let reached = live.iter().filter(|c| c.amount >= level).count() as u64;
        let amount = u64::from(level - previous) * reached;
        let eligible = eligible_at(level);
        previous = level;
        match tiers.last_mut() {
            // folded contributions can leave two levels with the same winners,
            // or a level nobody live reached
            Some(last) if last.eligible == eligible || eligible.is_empty() => {
                last.amount += amount;
            }
            _ => tiers.push(PotTier { amount, eligible }),
        }
    }

    let mut tiers = tiers.into_iter();
    Pot {
        main: tiers.next().unwrap_or_default(),
        side_pots: tiers.collect(),
    }
}

/// A declared winner of one pot (0 = main, `i` = side pot `i - 1`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotWinner {
    pub player_id: PlayerId,
    pub pot_index: usize,
}

impl PotWinner {
    pub fn new(player_id: impl Into<PlayerId>, pot_index: usize) -> Self {
        Self {
            player_id: player_id.into(),
            pot_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub player_id: PlayerId,
    pub amount: u64,
}

/// Splits every pot among its declared winners.
///
/// Each pot is divided evenly; the odd chips go one at a time to that pot's winners
/// in the order they were listed. Payouts are merged per player, in order of first
/// appearance, and always sum to the pot total.
pub fn distribute_pot(pot: &Pot, winners: &[PotWinner]) -> Result<Vec<Payout>, PotError> {
    let pot_count = pot.pot_count();
    if let Some(w) = winners.iter().find(|w| w.pot_index >= pot_count) {
        return Err(PotError::InvalidPotIndex {
            index: w.pot_index,
            pot_count,
        });
    }

    let mut payouts: Vec<Payout> = Vec::new();
    for (index, tier) in pot.tiers().enumerate() {
        let mut tier_winners: Vec<&PlayerId> = Vec::new();
        for w in winners.iter().filter(|w| w.pot_index == index) {
            if !tier.eligible.is_empty() && !tier.eligible.contains(&w.player_id) {
                return Err(PotError::IneligibleWinner {
                    player: w.player_id.clone(),
                    index,
                });
            }
            if !tier_winners.contains(&&w.player_id) {
                tier_winners.push(&w.player_id);
            }
        }

        if tier_winners.is_empty() {
            if tier.amount == 0 {
                continue;
            }
            return Err(match index {
                0 => PotError::UnassignedMainPot {
                    amount: tier.amount,
                },
                side_pot => PotError::UnassignedSidePot {
                    side_pot,
                    amount: tier.amount,
                },
            });
        }

        let n = tier_winners.len() as u64;
        let share = tier.amount / n;
        let odd = tier.amount % n;
        for (i, id) in tier_winners.into_iter().enumerate() {
            let amount = share + u64::from((i as u64) < odd);
            match payouts.iter_mut().find(|p| &p.player_id == id) {
                Some(p) => p.amount += amount,
                None => payouts.push(Payout {
                    player_id: id.clone(),
                    amount,
                }),
            }
        }
    }
    Ok(payouts)
}

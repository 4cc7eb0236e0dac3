//! Showdown: rank the remaining hands and pay out every pot.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{GameError, StateError};
use crate::game::{GameState, GameStatus};
use crate::hand::{evaluate_hand, HandEvaluation};
use crate::player::PlayerId;
use crate::pot::{distribute_pot, Payout, Pot, PotWinner};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowdownResult {
    /// Shown hands, empty when the pot was won uncontested
    pub hands: Vec<(PlayerId, HandEvaluation)>,
    pub winners: Vec<PotWinner>,
    pub payouts: Vec<Payout>,
}

/// Settles a hand at [`GameStatus::Showdown`] and moves it to
/// [`GameStatus::Complete`].
///
/// Each pot goes to the best hand among its eligible players; ties split it, with
/// odd chips going first to the winner closest to the dealer's left.
pub fn settle_showdown(state: &GameState) -> Result<(GameState, ShowdownResult), GameError> {
    if state.status != GameStatus::Showdown {
        return Err(StateError::WrongStatus(state.status).into());
    }

    // contenders in odd-chip order: left of the dealer first
    let n = state.players.len();
    let contenders: Vec<usize> = (1..=n)
        .map(|step| (state.dealer_index + step) % n)
        .filter(|&i| state.players[i].in_hand())
        .collect();
    if contenders.is_empty() {
        return Err(StateError::Invalid("no player left in the hand".into()).into());
    }

    let hands: Vec<(PlayerId, HandEvaluation)> = if contenders.len() == 1 {
        Vec::new()
    } else {
        contenders
            .iter()
            .map(|&i| -> Result<(PlayerId, HandEvaluation), GameError> {
                let p = &state.players[i];
                let hole = p.hole.ok_or_else(|| {
                    StateError::Invalid(format!("player {} has no hole cards", p.id))
                })?;
                Ok((p.id.clone(), evaluate_hand(&hole, &state.community_cards)?))
            })
            .collect::<Result<_, _>>()?
    };

    let pot = &state.pot;
    let contender_ids: Vec<PlayerId> = contenders
        .iter()
        .map(|&i| state.players[i].id.clone())
        .collect();
    let winners = pot_winners(pot, &contender_ids, &hands);
    let payouts = distribute_pot(pot, &winners)?;

    let mut next = state.clone();
    for payout in &payouts {
        if let Some(p) = next.players.iter_mut().find(|p| p.id == payout.player_id) {
            let chips = u64::from(p.chips) + payout.amount;
            p.chips = u32::try_from(chips).map_err(|_| {
                StateError::Invalid(format!("player {} would hold {chips} chips", p.id))
            })?;
        }
    }
    next.pot = Pot::default();
    next.current_bet = 0;
    next.current_player = None;
    next.status = GameStatus::Complete;

    for (id, eval) in &hands {
        info!(hand = next.hand_number, player = %id, shows = %eval.description, "showdown");
    }
    for payout in &payouts {
        info!(
            hand = next.hand_number,
            player = %payout.player_id,
            amount = payout.amount,
            "pot awarded"
        );
    }
    Ok((
        next,
        ShowdownResult {
            hands,
            winners,
            payouts,
        },
    ))
}

/// Picks the winners of every pot with chips in it.
///
/// With no shown hands the (single) contender takes everything.
fn pot_winners(
    pot: &Pot,
    contenders: &[PlayerId],
    hands: &[(PlayerId, HandEvaluation)],
) -> Vec<PotWinner> {
    let mut winners = Vec::new();
    for (index, tier) in pot.tiers().enumerate() {
        if tier.amount == 0 {
            continue;
        }
        let mut eligible: Vec<&PlayerId> = contenders
            .iter()
            .filter(|id| tier.eligible.contains(*id))
            .collect();
        if eligible.is_empty() {
            eligible = contenders.iter().collect();
        }
        let value_of = |id: &PlayerId| {
            hands
                .iter()
                .find(|(h, _)| h == id)
                .map_or(0, |(_, e)| e.value)
        };
        let best = eligible.iter().map(|id| value_of(id)).max().unwrap_or(0);
        winners.extend(
            eligible
                .into_iter()
                .filter(|id| value_of(id) == best)
                .map(|id| PotWinner {
                    player_id: id.clone(),
                    pot_index: index,
                }),
        );
    }
    winners
}

use holdem_engine::errors::PotError;
use holdem_engine::player::PlayerId;
use holdem_engine::pot::{
    calculate_pot, distribute_pot, Contribution, Payout, Pot, PotTier, PotWinner,
};
use proptest::prelude::*;

fn ids(names: &[&str]) -> Vec<PlayerId> {
    names.iter().map(|&n| PlayerId::from(n)).collect()
}

fn paid(payouts: &[Payout]) -> Vec<(&str, u64)> {
    payouts
        .iter()
        .map(|p| (p.player_id.0.as_str(), p.amount))
        .collect()
}

#[test]
fn no_all_in_gives_single_main_pot() {
    let pot = calculate_pot(&[
        Contribution::new("a", 100, false),
        Contribution::new("b", 100, false),
        Contribution::new("c", 50, false).folded(),
    ]);
    assert_eq!(pot.main.amount, 250);
    assert_eq!(pot.main.eligible, ids(&["a", "b"]));
    assert!(pot.side_pots.is_empty());
}

#[test]
fn two_all_ins_build_tiered_side_pots() {
    let pot = calculate_pot(&[
        Contribution::new("p1", 30, true),
        Contribution::new("p2", 60, true),
        Contribution::new("p3", 100, false),
        Contribution::new("p4", 100, false),
    ]);
    assert_eq!(pot.main.amount, 120);
    assert_eq!(pot.main.eligible, ids(&["p1", "p2", "p3", "p4"]));
    assert_eq!(
        pot.side_pots,
        vec![
            PotTier {
                amount: 90,
                eligible: ids(&["p2", "p3", "p4"]),
            },
            PotTier {
                amount: 80,
                eligible: ids(&["p3", "p4"]),
            },
        ]
    );
    assert_eq!(pot.total(), 290);
}

#[test]
fn equal_all_ins_share_one_level() {
    let pot = calculate_pot(&[
        Contribution::new("a", 500, true),
        Contribution::new("b", 500, true),
        Contribution::new("c", 1000, false),
    ]);
    assert_eq!(pot.main.amount, 1500);
    assert_eq!(pot.side_pots.len(), 1);
    assert_eq!(pot.side_pots[0].amount, 500);
    assert_eq!(pot.side_pots[0].eligible, ids(&["c"]));
}

#[test]
fn heads_up_simple_side_pot() {
    let pot = calculate_pot(&[
        Contribution::new("short", 500, true),
        Contribution::new("deep", 1000, false),
    ]);
    assert_eq!(pot.main.amount, 1000);
    assert_eq!(pot.side_pots.len(), 1);
    assert_eq!(pot.side_pots[0].amount, 500);
}

#[test]
fn three_way_split_gives_odd_chip_in_order() {
    let pot = Pot {
        main: PotTier {
            amount: 100,
            eligible: ids(&["a", "b", "c"]),
        },
        side_pots: vec![],
    };
    let winners = [
        PotWinner::new("b", 0),
        PotWinner::new("a", 0),
        PotWinner::new("c", 0),
    ];
    let payouts = distribute_pot(&pot, &winners).unwrap();
    assert_eq!(paid(&payouts), vec![("b", 34), ("a", 33), ("c", 33)]);
}

#[test]
fn winners_collect_across_pots() {
    let pot = calculate_pot(&[
        Contribution::new("p1", 30, true),
        Contribution::new("p2", 60, true),
        Contribution::new("p3", 100, false),
        Contribution::new("p4", 100, false),
    ]);
    // p1 wins the main pot, p3 and p4 chop both side pots
    let winners = [
        PotWinner::new("p1", 0),
        PotWinner::new("p3", 1),
        PotWinner::new("p4", 1),
        PotWinner::new("p3", 2),
        PotWinner::new("p4", 2),
    ];
    let payouts = distribute_pot(&pot, &winners).unwrap();
    assert_eq!(paid(&payouts), vec![("p1", 120), ("p3", 85), ("p4", 85)]);
}

#[test]
fn side_pot_without_winner_is_rejected() {
    let pot = calculate_pot(&[
        Contribution::new("a", 30, true),
        Contribution::new("b", 60, false),
        Contribution::new("c", 60, false),
    ]);
    let err = distribute_pot(&pot, &[PotWinner::new("a", 0)]).unwrap_err();
    assert_eq!(
        err,
        PotError::UnassignedSidePot {
            side_pot: 1,
            amount: 60
        }
    );
}

#[test]
fn main_pot_without_winner_is_rejected() {
    let pot = calculate_pot(&[
        Contribution::new("a", 10, false),
        Contribution::new("b", 10, false),
    ]);
    assert_eq!(
        distribute_pot(&pot, &[]),
        Err(PotError::UnassignedMainPot { amount: 20 })
    );
}

#[test]
fn unknown_pot_index_is_rejected() {
    let pot = calculate_pot(&[
        Contribution::new("a", 10, false),
        Contribution::new("b", 10, false),
    ]);
    assert_eq!(
        distribute_pot(&pot, &[PotWinner::new("a", 0), PotWinner::new("a", 2)]),
        Err(PotError::InvalidPotIndex {
            index: 2,
            pot_count: 1
        })
    );
}

#[test]
fn ineligible_winner_is_rejected() {
    let pot = calculate_pot(&[
        Contribution::new("a", 30, true),
        Contribution::new("b", 60, false),
        Contribution::new("c", 60, false),
    ]);
    let err = distribute_pot(&pot, &[PotWinner::new("a", 0), PotWinner::new("a", 1)]).unwrap_err();
    assert!(matches!(err, PotError::IneligibleWinner { index: 1, .. }));
}

fn contributions() -> impl Strategy<Value = Vec<Contribution>> {
    prop::collection::vec((0u32..5_000, any::<bool>(), any::<bool>()), 1..10).prop_map(|v| {
        v.into_iter()
            .enumerate()
            .map(|(i, (amount, all_in, folded))| Contribution {
                player_id: PlayerId(format!("p{i}")),
                amount,
                is_all_in: all_in && !folded,
                has_folded: folded,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn pots_conserve_contributions(contribs in contributions()) {
        let pot = calculate_pot(&contribs);
        let total: u64 = contribs.iter().map(|c| u64::from(c.amount)).sum();
        prop_assert_eq!(pot.total(), total);
        for tier in pot.tiers() {
            for id in &tier.eligible {
                let c = contribs.iter().find(|c| &c.player_id == id).unwrap();
                prop_assert!(!c.has_folded);
            }
        }
    }

    #[test]
    fn split_matches_floor_and_ceil(amount in 0u64..100_000, n in 1usize..9) {
        let names: Vec<String> = (0..n).map(|i| format!("w{i}")).collect();
        let pot = Pot {
            main: PotTier {
                amount,
                eligible: names.iter().map(|s| PlayerId(s.clone())).collect(),
            },
            side_pots: vec![],
        };
        let winners: Vec<PotWinner> = names.iter().map(|s| PotWinner::new(s.as_str(), 0)).collect();
        let payouts = distribute_pot(&pot, &winners).unwrap();
        prop_assert_eq!(payouts.iter().map(|p| p.amount).sum::<u64>(), amount);

        let n = n as u64;
        let odd = (amount % n) as usize;
        for (i, p) in payouts.iter().enumerate() {
            let expected = if i < odd { amount / n + 1 } else { amount / n };
            prop_assert_eq!(p.amount, expected);
        }
    }

    #[test]
    fn distribution_pays_out_every_chip(contribs in contributions()) {
        let pot = calculate_pot(&contribs);
        // the first eligible player (or anyone, for an empty set) wins each tier
        let winners: Vec<PotWinner> = pot
            .tiers()
            .enumerate()
            .map(|(i, t)| PotWinner {
                player_id: t
                    .eligible
                    .first()
                    .cloned()
                    .unwrap_or_else(|| contribs[0].player_id.clone()),
                pot_index: i,
            })
            .collect();
        let payouts = distribute_pot(&pot, &winners).unwrap();
        prop_assert_eq!(payouts.iter().map(|p| p.amount).sum::<u64>(), pot.total());
    }
}

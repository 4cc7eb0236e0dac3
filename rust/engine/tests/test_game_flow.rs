use holdem_engine::betting::{apply_action, is_round_complete, next_actor};
use holdem_engine::deck::Deck;
use holdem_engine::engine::{advance_street, rotate_dealer, start_hand};
use holdem_engine::errors::{ActionError, GameError, StateError};
use holdem_engine::game::{GameState, GameStatus};
use holdem_engine::player::{Player, PlayerAction as A, PlayerId};
use holdem_engine::pot::calculate_pot;
use holdem_engine::rng::SeededRandom;
use holdem_engine::showdown::settle_showdown;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn id(s: &str) -> PlayerId {
    PlayerId::from(s)
}

fn seated(chips: &[u32]) -> GameState {
    let players = chips
        .iter()
        .enumerate()
        .map(|(i, &c)| Player::new(format!("p{i}"), c, i))
        .collect();
    GameState::new(players, 5, 10).unwrap()
}

/// A street in progress: everyone dealt in, `p0` to act, blinds 50/100.
fn betting(chips: &[u32]) -> GameState {
    let players = chips
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let mut p = Player::new(format!("p{i}"), c, i);
            p.is_active = true;
            p
        })
        .collect();
    let mut state = GameState::new(players, 50, 100).unwrap();
    state.status = GameStatus::Flop;
    state.current_player = Some(0);
    state
}

fn wager(mut state: GameState, idx: usize, amount: u32) -> GameState {
    let p = &mut state.players[idx];
    p.chips -= amount;
    p.round_bet += amount;
    p.total_bet += amount;
    state.current_bet = state.current_bet.max(p.round_bet);
    state.pot = calculate_pot(&state.contributions());
    state
}

/// Applies the action for whoever is to act.
fn act(state: &GameState, action: A) -> GameState {
    let actor = state.current_actor().expect("someone to act").id.clone();
    apply_action(state, &actor, action).unwrap()
}

fn total_chips(state: &GameState) -> u64 {
    state.players.iter().map(|p| u64::from(p.chips)).sum::<u64>() + state.pot.total()
}

#[test]
fn fold_leaves_the_bet_alone() {
    let state = wager(betting(&[1_000, 1_000, 1_000]), 2, 100);
    let next = apply_action(&state, &id("p0"), A::Fold).unwrap();
    let p = &next.players[0];
    assert!(p.has_folded);
    assert!(!p.is_active);
    assert_eq!(next.current_bet, 100);
    assert_eq!(next.current_player, Some(1));
    // the input snapshot is untouched
    assert!(!state.players[0].has_folded);
}

#[test]
fn short_call_goes_all_in_without_moving_the_bet() {
    let state = wager(betting(&[100, 1_000]), 1, 200);
    let next = apply_action(&state, &id("p0"), A::Call).unwrap();
    let p = &next.players[0];
    assert_eq!(p.round_bet, 100);
    assert_eq!(p.chips, 0);
    assert!(p.is_all_in);
    assert_eq!(next.current_bet, 200);

    assert_eq!(next.pot.main.amount, 200);
    assert_eq!(next.pot.side_pots.len(), 1);
    assert_eq!(next.pot.side_pots[0].amount, 100);
    // the bettor already covers everything, so nobody is left to act
    assert!(is_round_complete(&next));
    assert_eq!(next.current_player, None);
}

#[test]
fn bet_and_raise_set_the_round_total() {
    let state = betting(&[1_000, 1_000, 1_000]);
    let state = apply_action(&state, &id("p0"), A::Bet(150)).unwrap();
    assert_eq!(state.current_bet, 150);
    assert_eq!(state.players[0].chips, 850);

    let state = apply_action(&state, &id("p1"), A::Raise(300)).unwrap();
    assert_eq!(state.current_bet, 300);
    assert_eq!(state.players[1].round_bet, 300);
    assert_eq!(state.min_raise_to(), 600);

    let state = apply_action(&state, &id("p2"), A::Call).unwrap();
    assert_eq!(state.players[2].round_bet, 300);
    // p0 must answer the raise
    assert_eq!(state.current_player, Some(0));
    let state = apply_action(&state, &id("p0"), A::Call).unwrap();
    assert_eq!(state.players[0].chips, 700);
    assert_eq!(state.current_player, None);
    assert_eq!(state.pot.total(), 900);
}

#[test]
fn turn_order_skips_folded_and_all_in_players() {
    let mut state = betting(&[1_000, 1_000, 1_000, 1_000]);
    state.players[1].has_folded = true;
    state.players[1].is_active = false;
    state.players[2].is_all_in = true;
    assert_eq!(next_actor(&state, 0), Some(3));
    assert_eq!(next_actor(&state, 3), Some(0));

    state.players[0].is_all_in = true;
    state.players[3].is_all_in = true;
    assert_eq!(next_actor(&state, 0), None);
}

#[test]
fn everyone_checking_closes_the_street() {
    let state = betting(&[1_000, 1_000, 1_000]);
    let state = act(&state, A::Check);
    let state = act(&state, A::Check);
    assert!(!is_round_complete(&state));
    assert_eq!(state.current_player, Some(2));
    let state = act(&state, A::Check);
    assert!(is_round_complete(&state));
    assert_eq!(state.current_player, None);
}

#[test]
fn short_all_in_does_not_reopen_action() {
    let state = betting(&[1_000, 1_000, 60]);
    let state = apply_action(&state, &id("p0"), A::Bet(100)).unwrap();
    let state = apply_action(&state, &id("p1"), A::Call).unwrap();
    let state = apply_action(&state, &id("p2"), A::AllIn).unwrap();
    assert_eq!(state.current_bet, 100);
    assert!(state.players[2].is_all_in);
    assert_eq!(state.current_player, None);
}

#[test]
fn all_in_raise_reopens_action() {
    let state = betting(&[1_000, 1_000, 250]);
    let state = apply_action(&state, &id("p0"), A::Bet(100)).unwrap();
    let state = apply_action(&state, &id("p1"), A::Call).unwrap();
    let state = apply_action(&state, &id("p2"), A::AllIn).unwrap();
    assert_eq!(state.current_bet, 250);
    assert_eq!(state.current_player, Some(0));
    assert_eq!(state.min_raise_to(), 500);
}

#[test]
fn bet_never_takes_back_chips_already_wagered() {
    // round bet above the current bet, as a hand-edited snapshot might carry
    let mut state = betting(&[1_000, 1_000]);
    let p = &mut state.players[0];
    p.chips = 700;
    p.round_bet = 300;
    p.total_bet = 300;
    state.pot = calculate_pot(&state.contributions());

    let next = apply_action(&state, &id("p0"), A::Bet(100)).unwrap();
    assert_eq!(next.players[0].round_bet, 300);
    assert_eq!(next.players[0].chips, 700);
    assert_eq!(next.current_bet, 300);
    assert_eq!(next.pot.total(), 300);
    assert_eq!(next.current_player, Some(1));
}

#[test]
fn rejected_action_reports_the_rule() {
    let state = betting(&[1_000, 1_000]);
    assert_eq!(
        apply_action(&state, &id("p1"), A::Check),
        Err(ActionError::NotPlayersTurn { actual: id("p1") })
    );
}

#[test]
fn big_blind_gets_the_option_preflop() {
    let state = seated(&[1_000, 1_000, 1_000]);
    let deck = Deck::new().shuffled(&mut SeededRandom::new(11));
    let (state, deck) = start_hand(&state, &deck).unwrap();

    let state = act(&state, A::Call); // p0
    let state = act(&state, A::Call); // p1, small blind completes
    assert_eq!(state.current_player, Some(2));
    assert!(matches!(
        advance_street(&state, &deck),
        Err(GameError::State(StateError::RoundIncomplete))
    ));

    let state = act(&state, A::Check); // p2, big blind
    assert_eq!(state.current_player, None);
    let (flop, deck) = advance_street(&state, &deck).unwrap();
    assert_eq!(flop.status, GameStatus::Flop);
    assert_eq!(flop.community_cards.len(), 3);
    assert_eq!(flop.current_bet, 0);
    assert!(flop.players.iter().all(|p| p.round_bet == 0 && !p.has_acted));
    // first to act after the flop sits left of the dealer
    assert_eq!(flop.current_player, Some(1));
    // 6 hole cards, one burn, three flop cards
    assert_eq!(deck.remaining(), 42);
    flop.validate().unwrap();
}

#[test]
fn seeded_hand_plays_to_showdown() {
    init_tracing();
    let state = seated(&[1_000, 1_000, 1_000]);
    let deck = Deck::new().shuffled(&mut SeededRandom::new(2024));
    let (state, deck) = start_hand(&state, &deck).unwrap();

    let state = act(&state, A::Call);
    let state = act(&state, A::Call);
    let state = act(&state, A::Check);
    let (state, deck) = advance_street(&state, &deck).unwrap();

    // flop: p1 bets, p2 raises, both others call
    let state = act(&state, A::Bet(20));
    let state = act(&state, A::Raise(40));
    let state = act(&state, A::Call);
    assert_eq!(state.current_player, Some(1));
    let state = act(&state, A::Call);
    let (mut state, mut deck) = advance_street(&state, &deck).unwrap();

    for street in [GameStatus::Turn, GameStatus::River] {
        assert_eq!(state.status, street);
        for _ in 0..3 {
            state = act(&state, A::Check);
        }
        (state, deck) = advance_street(&state, &deck).unwrap();
    }
    assert_eq!(state.status, GameStatus::Showdown);
    assert_eq!(state.community_cards.len(), 5);
    assert_eq!(state.pot.total(), 150);
    assert_eq!(deck.remaining(), 52 - 6 - 3 - 5);

    let (done, result) = settle_showdown(&state).unwrap();
    assert_eq!(done.status, GameStatus::Complete);
    assert_eq!(result.hands.len(), 3);
    assert_eq!(total_chips(&done), 3_000);
    assert_eq!(done.pot.total(), 0);
    let paid: u64 = result.payouts.iter().map(|p| p.amount).sum();
    assert_eq!(paid, 150);
    done.validate().unwrap();

    let next = rotate_dealer(&done).unwrap();
    assert_eq!(next.dealer_index, 1);
    let (next, _) = start_hand(&next, &Deck::new().shuffled(&mut SeededRandom::new(2025))).unwrap();
    assert_eq!(next.hand_number, 2);
    assert_eq!(next.players[2].round_bet, 5);
    assert_eq!(next.players[0].round_bet, 10);
}

#[test]
fn all_in_runs_the_board_out() {
    init_tracing();
    let state = seated(&[1_000, 300]);
    let deck = Deck::new().shuffled(&mut SeededRandom::new(99));
    let (state, deck) = start_hand(&state, &deck).unwrap();

    let state = act(&state, A::AllIn);
    assert_eq!(state.current_bet, 1_000);
    let state = act(&state, A::Call);
    assert!(state.players.iter().all(|p| p.is_all_in));
    assert_eq!(state.current_player, None);
    assert_eq!(state.pot.main.amount, 600);
    assert_eq!(state.pot.side_pots[0].amount, 700);

    let mut state = state;
    let mut deck = deck;
    while state.status != GameStatus::Showdown {
        (state, deck) = advance_street(&state, &deck).unwrap();
        assert_eq!(state.current_player, None);
    }
    assert_eq!(state.community_cards.len(), 5);

    let (done, result) = settle_showdown(&state).unwrap();
    assert_eq!(total_chips(&done), 1_300);
    // only the deep stack can win the uncalled side pot
    let p0 = result.payouts.iter().find(|p| p.player_id == id("p0")).unwrap();
    assert!(p0.amount >= 700);
}

#[test]
fn everyone_folds_to_one_player() {
    let state = seated(&[1_000, 1_000, 1_000]);
    let (state, deck) = start_hand(&state, &Deck::new()).unwrap();
    let state = act(&state, A::Fold);
    let state = act(&state, A::Fold);
    assert_eq!(state.current_player, None);

    let (state, deck_after) = advance_street(&state, &deck).unwrap();
    assert_eq!(state.status, GameStatus::Showdown);
    assert!(state.community_cards.is_empty());
    assert_eq!(deck_after, deck);

    let (done, result) = settle_showdown(&state).unwrap();
    assert!(result.hands.is_empty());
    assert_eq!(done.players[2].chips, 1_005);
    assert_eq!(done.players[1].chips, 995);
    assert_eq!(total_chips(&done), 3_000);
}

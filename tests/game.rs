//! Round state machine integration tests.

use bjtable::{
    ActionError, BetError, BetOutcome, Card, ConnectionId, DealerStep, Deck, HandOutcome,
    JoinError, Phase, PlayerId, PlayerStatus, ShowdownError, StartPolicy, Suit, Table,
    TableOptions,
};

const fn card(suit: Suit, rank: u8) -> Card {
    Card::new(suit, rank)
}

fn table() -> Table {
    Table::new(TableOptions::default(), 7)
}

fn seat(table: &mut Table, connection: u64) -> PlayerId {
    table.connect(ConnectionId(connection)).unwrap().id
}

#[test]
fn connect_assigns_identity_and_balance() {
    let mut table = table();
    let init = table.connect(ConnectionId(10)).unwrap();

    assert_eq!(init.balance, 1000);
    assert_eq!(init.name, "Player 1");
    assert_eq!(table.resolve(ConnectionId(10)), Some(init.id));

    let player = table.player(init.id).unwrap();
    assert_eq!(player.status, PlayerStatus::Connected);
    assert_eq!(player.bet, 0);
    assert!(player.hand.is_empty());

    let second = table.connect(ConnectionId(11)).unwrap();
    assert_ne!(second.id, init.id);
    assert_eq!(second.name, "Player 2");
}

#[test]
fn connect_errors() {
    let mut table = Table::new(TableOptions::default().with_max_players(1), 1);
    table.connect(ConnectionId(1)).unwrap();

    assert_eq!(
        table.connect(ConnectionId(1)).unwrap_err(),
        JoinError::AlreadyConnected
    );
    assert_eq!(
        table.connect(ConnectionId(2)).unwrap_err(),
        JoinError::TableFull
    );
}

#[test]
fn bet_errors() {
    let mut table = table();
    let player = seat(&mut table, 1);
    let _other = seat(&mut table, 2);

    assert_eq!(table.place_bet(player, 0).unwrap_err(), BetError::ZeroBet);
    assert_eq!(
        table.place_bet(player, 1001).unwrap_err(),
        BetError::InsufficientFunds
    );

    table.disconnect(ConnectionId(2));
    let stranger = seat(&mut table, 3);
    table.disconnect(ConnectionId(3));
    assert_eq!(
        table.place_bet(stranger, 10).unwrap_err(),
        BetError::PlayerNotFound
    );

    // Rejections leave the balance alone.
    assert_eq!(table.player(player).unwrap().balance, 1000);
}

#[test]
fn staged_bets_accumulate_against_remaining_balance() {
    let mut table = table();
    let player = seat(&mut table, 1);
    let _waiting = seat(&mut table, 2);

    assert_eq!(table.place_bet(player, 600).unwrap(), BetOutcome::Staged);
    assert_eq!(
        table.place_bet(player, 500).unwrap_err(),
        BetError::InsufficientFunds
    );
    assert_eq!(table.place_bet(player, 400).unwrap(), BetOutcome::Staged);

    let record = table.player(player).unwrap();
    assert_eq!(record.bet, 1000);
    assert_eq!(record.balance, 0);
    assert_eq!(record.status, PlayerStatus::BettingOpen);
    assert_eq!(table.phase(), Phase::Betting);
}

#[test]
fn round_waits_for_every_seated_player() {
    let mut table = table();
    let first = seat(&mut table, 1);
    let second = seat(&mut table, 2);

    assert_eq!(table.place_bet(first, 50).unwrap(), BetOutcome::Staged);
    assert!(!table.ready_to_deal());
    assert_eq!(table.place_bet(second, 50).unwrap(), BetOutcome::RoundStarted);

    assert_ne!(table.phase(), Phase::Betting);
    assert_eq!(table.turn_order(), &[first, second]);
    assert_eq!(table.dealer_hand().len(), 2);
    assert_eq!(table.cards_remaining(), 52 - 6);
}

#[test]
fn first_bet_policy_deals_immediately() {
    let options = TableOptions::default().with_start_policy(StartPolicy::FirstBet);
    let mut table = Table::new(options, 3);
    let first = seat(&mut table, 1);
    let idle = seat(&mut table, 2);

    assert_eq!(table.place_bet(first, 10).unwrap(), BetOutcome::RoundStarted);
    assert_eq!(table.turn_order(), &[first]);
    assert!(table.player(idle).unwrap().hand.is_empty());
    assert_eq!(table.place_bet(idle, 10).unwrap_err(), BetError::InvalidState);
}

#[test]
fn deal_interleaves_players_and_dealer() {
    let mut table = table();
    let first = seat(&mut table, 1);
    let second = seat(&mut table, 2);

    table.preset_next_deck(&[
        card(Suit::Hearts, 2),   // first
        card(Suit::Hearts, 3),   // second
        card(Suit::Hearts, 4),   // dealer up
        card(Suit::Clubs, 5),    // first
        card(Suit::Clubs, 6),    // second
        card(Suit::Clubs, 7),    // dealer hole
    ]);
    table.place_bet(first, 10).unwrap();
    table.place_bet(second, 10).unwrap();

    assert_eq!(
        table.player(first).unwrap().hand.cards(),
        &[card(Suit::Hearts, 2), card(Suit::Clubs, 5)]
    );
    assert_eq!(
        table.player(second).unwrap().hand.cards(),
        &[card(Suit::Hearts, 3), card(Suit::Clubs, 6)]
    );
    assert_eq!(
        table.dealer_hand().cards(),
        &[card(Suit::Hearts, 4), card(Suit::Clubs, 7)]
    );
    assert_eq!(table.phase(), Phase::PlayerTurn);
    assert_eq!(table.current_player(), Some(first));
}

#[test]
fn actions_are_phase_and_turn_gated() {
    let mut table = table();
    let first = seat(&mut table, 1);
    let second = seat(&mut table, 2);

    assert_eq!(table.hit(first).unwrap_err(), ActionError::InvalidState);
    assert_eq!(table.stand(first).unwrap_err(), ActionError::InvalidState);

    table.preset_next_deck(&[
        card(Suit::Hearts, 10),
        card(Suit::Hearts, 9),
        card(Suit::Spades, 7),
        card(Suit::Clubs, 5),
        card(Suit::Clubs, 6),
        card(Suit::Diamonds, 10),
    ]);
    table.place_bet(first, 10).unwrap();
    table.place_bet(second, 10).unwrap();

    let before = table.view();
    assert_eq!(table.hit(second).unwrap_err(), ActionError::NotYourTurn);
    assert_eq!(table.stand(second).unwrap_err(), ActionError::NotYourTurn);
    assert_eq!(table.view(), before);
}

#[test]
fn hit_to_21_stands_automatically() {
    let mut table = table();
    let player = seat(&mut table, 1);

    table.preset_next_deck(&[
        card(Suit::Hearts, 5),
        card(Suit::Clubs, 10),
        card(Suit::Spades, 6),
        card(Suit::Diamonds, 7),
        card(Suit::Hearts, 10), // hit to 21
    ]);
    table.place_bet(player, 10).unwrap();

    let drawn = table.hit(player).unwrap();
    assert_eq!(drawn, card(Suit::Hearts, 10));

    let record = table.player(player).unwrap();
    assert_eq!(record.score(), 21);
    assert_eq!(record.status, PlayerStatus::Stood);
    assert_eq!(table.phase(), Phase::DealerTurn);
    assert_eq!(table.hit(player).unwrap_err(), ActionError::InvalidState);
}

#[test]
fn basic_round_flow() {
    let mut table = table();
    let player = seat(&mut table, 1);

    table.preset_next_deck(&[
        card(Suit::Hearts, 8),   // player
        card(Suit::Clubs, 6),    // dealer up
        card(Suit::Diamonds, 7), // player
        card(Suit::Spades, 10),  // dealer hole
        card(Suit::Hearts, 4),   // player hit
        card(Suit::Clubs, 5),    // dealer draw
    ]);
    table.place_bet(player, 10).unwrap();
    assert_eq!(table.phase(), Phase::PlayerTurn);

    assert_eq!(table.hit(player).unwrap(), card(Suit::Hearts, 4));
    table.stand(player).unwrap();
    assert_eq!(table.phase(), Phase::DealerTurn);
    assert_eq!(
        table.player(player).unwrap().message,
        "Stood on 19"
    );

    assert_eq!(
        table.dealer_step().unwrap(),
        DealerStep::Drew(card(Suit::Clubs, 5))
    );
    let DealerStep::Settled(result) = table.dealer_step().unwrap() else {
        panic!("dealer should stand on 21");
    };
    assert_eq!(table.phase(), Phase::Results);
    assert_eq!(result.dealer_value, 21);
    assert_eq!(result.players[0].outcome, HandOutcome::Lose);
    assert_eq!(result.players[0].net, -10);
    assert_eq!(table.player(player).unwrap().balance, 990);

    table.finish_round().unwrap();
    assert_eq!(table.phase(), Phase::Betting);
    assert!(table.dealer_hand().is_empty());
    assert!(table.turn_order().is_empty());
    // The final hand stays on the table until the next deal.
    assert_eq!(table.player(player).unwrap().hand.len(), 3);
}

#[test]
fn dealer_stands_on_soft_17() {
    let mut table = table();
    let player = seat(&mut table, 1);

    table.preset_next_deck(&[
        card(Suit::Hearts, 10),
        card(Suit::Spades, 1),  // dealer up
        card(Suit::Hearts, 7),
        card(Suit::Clubs, 6),   // dealer hole: soft 17
    ]);
    table.place_bet(player, 10).unwrap();
    table.stand(player).unwrap();

    let result = table.dealer_play().unwrap();
    assert_eq!(result.dealer_value, 17);
    assert_eq!(table.dealer_hand().len(), 2);
    assert_eq!(result.players[0].outcome, HandOutcome::Push);
    assert_eq!(table.player(player).unwrap().balance, 1000);
}

#[test]
fn dealer_bust_pays_even_money() {
    let mut table = table();
    let player = seat(&mut table, 1);

    table.preset_next_deck(&[
        card(Suit::Hearts, 10),
        card(Suit::Spades, 10),
        card(Suit::Hearts, 2),
        card(Suit::Clubs, 6),
        card(Suit::Diamonds, 13), // dealer draws to 26
    ]);
    table.place_bet(player, 100).unwrap();
    table.stand(player).unwrap();

    let result = table.dealer_play().unwrap();
    assert!(result.dealer_bust);
    assert_eq!(result.players[0].outcome, HandOutcome::Win);
    assert_eq!(result.players[0].payout, 200);
    assert_eq!(table.player(player).unwrap().balance, 1100);
}

#[test]
fn natural_blackjack_pays_three_to_two() {
    let mut table = table();
    let player = seat(&mut table, 1);

    table.preset_next_deck(&[
        card(Suit::Spades, 10),
        card(Suit::Clubs, 9),   // dealer up
        card(Suit::Hearts, 1),
        card(Suit::Hearts, 9),  // dealer hole: 18
    ]);
    table.place_bet(player, 100).unwrap();
    assert_eq!(table.player(player).unwrap().balance, 900);
    assert_eq!(
        table.player(player).unwrap().status,
        PlayerStatus::Blackjack
    );

    // Nobody left to act: straight to the dealer.
    assert_eq!(table.phase(), Phase::DealerTurn);
    assert_eq!(table.current_player(), None);

    let result = table.dealer_play().unwrap();
    assert_eq!(result.dealer_value, 18);
    assert_eq!(result.players[0].outcome, HandOutcome::Blackjack);
    assert_eq!(result.players[0].payout, 250);

    let record = table.player(player).unwrap();
    assert_eq!(record.balance, 1150);
    assert_eq!(record.bet, 0);
    assert_eq!(record.status, PlayerStatus::Settled);
}

#[test]
fn blackjack_payout_rounds_down() {
    let mut table = table();
    let player = seat(&mut table, 1);

    table.preset_next_deck(&[
        card(Suit::Spades, 1),
        card(Suit::Clubs, 10),
        card(Suit::Hearts, 12),
        card(Suit::Hearts, 8),
    ]);
    table.place_bet(player, 15).unwrap();

    let result = table.dealer_play().unwrap();
    // floor(15 * 2.5)
    assert_eq!(result.players[0].payout, 37);
    assert_eq!(table.player(player).unwrap().balance, 1022);
}

#[test]
fn bust_advances_only_past_busted_player() {
    let mut table = table();
    let first = seat(&mut table, 1);
    let second = seat(&mut table, 2);

    table.preset_next_deck(&[
        card(Suit::Hearts, 10),  // first
        card(Suit::Hearts, 9),   // second
        card(Suit::Spades, 7),   // dealer up
        card(Suit::Clubs, 4),    // first: 14
        card(Suit::Clubs, 6),    // second: 15
        card(Suit::Diamonds, 10),// dealer hole
        card(Suit::Diamonds, 13),// first hits to 24
        card(Suit::Spades, 5),   // second hits to 20
    ]);
    table.place_bet(first, 100).unwrap();
    table.place_bet(second, 100).unwrap();

    table.hit(first).unwrap();
    assert_eq!(table.player(first).unwrap().score(), 24);
    assert_eq!(table.player(first).unwrap().status, PlayerStatus::Busted);
    assert_eq!(table.phase(), Phase::PlayerTurn);
    assert_eq!(table.current_player(), Some(second));
    assert!(!table.claim_dealer_turn());

    table.hit(second).unwrap();
    assert_eq!(table.phase(), Phase::PlayerTurn);
    table.stand(second).unwrap();
    assert_eq!(table.phase(), Phase::DealerTurn);

    let result = table.dealer_play().unwrap();
    assert_eq!(result.player(first).unwrap().outcome, HandOutcome::Lose);
    assert_eq!(result.player(second).unwrap().outcome, HandOutcome::Win);
    assert_eq!(table.player(first).unwrap().balance, 900);
    assert_eq!(table.player(second).unwrap().balance, 1100);
}

#[test]
fn turn_holder_disconnect_keeps_round_moving() {
    let mut table = table();
    let first = seat(&mut table, 1);
    let second = seat(&mut table, 2);

    table.preset_next_deck(&[
        card(Suit::Hearts, 10),
        card(Suit::Hearts, 9),
        card(Suit::Spades, 7),
        card(Suit::Clubs, 4),
        card(Suit::Clubs, 6),
        card(Suit::Diamonds, 10),
    ]);
    table.place_bet(first, 100).unwrap();
    table.place_bet(second, 100).unwrap();
    table.stand(first).unwrap();
    assert_eq!(table.current_player(), Some(second));

    let departure = table.disconnect(ConnectionId(2)).unwrap();
    assert_eq!(departure.player.id, second);
    assert_eq!(departure.forfeited_bet, 100);
    assert_eq!(table.phase(), Phase::DealerTurn);
    assert!(table.player(second).is_none());

    let result = table.dealer_play().unwrap();
    assert_eq!(result.players.len(), 1);
    assert_eq!(result.players[0].player_id, first);
    table.finish_round().unwrap();
    assert_eq!(table.phase(), Phase::Betting);
}

#[test]
fn waiting_player_disconnect_is_skipped() {
    let mut table = table();
    let first = seat(&mut table, 1);
    let second = seat(&mut table, 2);
    let third = seat(&mut table, 3);

    table.preset_next_deck(&[
        card(Suit::Hearts, 10),
        card(Suit::Hearts, 9),
        card(Suit::Hearts, 8),
        card(Suit::Spades, 7),
        card(Suit::Clubs, 4),
        card(Suit::Clubs, 6),
        card(Suit::Clubs, 5),
        card(Suit::Diamonds, 10),
    ]);
    for player in [first, second, third] {
        table.place_bet(player, 10).unwrap();
    }

    table.disconnect(ConnectionId(2));
    assert_eq!(table.current_player(), Some(first));

    table.stand(first).unwrap();
    assert_eq!(table.current_player(), Some(third));
}

#[test]
fn last_player_leaving_mid_round_still_settles() {
    let mut table = table();
    let player = seat(&mut table, 1);

    table.preset_next_deck(&[
        card(Suit::Hearts, 10),
        card(Suit::Spades, 2),
        card(Suit::Clubs, 4),
        card(Suit::Diamonds, 3),
        card(Suit::Diamonds, 4), // dealer draws to 9
        card(Suit::Diamonds, 10), // then 19
    ]);
    table.place_bet(player, 10).unwrap();
    table.disconnect(ConnectionId(1));

    assert!(table.players().is_empty());
    assert!(table.claim_dealer_turn());
    let result = table.dealer_play().unwrap();
    assert!(result.players.is_empty());
    assert_eq!(result.dealer_value, 19);
    table.finish_round().unwrap();
    assert_eq!(table.phase(), Phase::Betting);
}

#[test]
fn betting_disconnect_can_start_the_round() {
    let mut table = table();
    let first = seat(&mut table, 1);
    let _idle = seat(&mut table, 2);

    table.place_bet(first, 10).unwrap();
    assert_eq!(table.phase(), Phase::Betting);

    let departure = table.disconnect(ConnectionId(2)).unwrap();
    assert_eq!(departure.forfeited_bet, 0);
    assert_ne!(table.phase(), Phase::Betting);
    assert_eq!(table.turn_order(), &[first]);
}

#[test]
fn betting_disconnect_refunds_staged_bet() {
    let mut table = table();
    let _first = seat(&mut table, 1);
    let second = seat(&mut table, 2);

    table.place_bet(second, 250).unwrap();
    let departure = table.disconnect(ConnectionId(2)).unwrap();

    assert_eq!(departure.player.id, second);
    assert_eq!(departure.forfeited_bet, 0);
    assert_eq!(departure.player.bet, 0);
    assert_eq!(departure.player.balance, 1000);
    assert_eq!(table.phase(), Phase::Betting);
}

#[test]
fn disconnect_unknown_connection_is_ignored() {
    let mut table = table();
    assert!(table.disconnect(ConnectionId(99)).is_none());
}

#[test]
fn all_blackjacks_enter_dealer_turn_exactly_once() {
    let mut table = table();
    let first = seat(&mut table, 1);
    let second = seat(&mut table, 2);

    table.preset_next_deck(&[
        card(Suit::Hearts, 1),
        card(Suit::Spades, 1),
        card(Suit::Clubs, 5),
        card(Suit::Hearts, 13),
        card(Suit::Spades, 12),
        card(Suit::Clubs, 12),
    ]);
    table.place_bet(first, 10).unwrap();
    table.place_bet(second, 10).unwrap();
    assert_eq!(table.phase(), Phase::DealerTurn);

    assert!(table.claim_dealer_turn());
    table.advance_turn();
    table.advance_turn();
    assert_eq!(table.phase(), Phase::DealerTurn);
    assert!(!table.claim_dealer_turn());
    assert_eq!(table.forfeit_current_turn(), None);
}

#[test]
fn dealer_step_requires_dealer_turn() {
    let mut table = table();
    assert_eq!(
        table.dealer_step().unwrap_err(),
        ShowdownError::InvalidState
    );
    assert_eq!(
        table.finish_round().unwrap_err(),
        ShowdownError::InvalidState
    );
}

#[test]
fn short_deck_aborts_deal_and_refunds() {
    let mut table = table();
    let player = seat(&mut table, 1);

    table.preset_next_deck(&[
        card(Suit::Hearts, 9),
        card(Suit::Clubs, 5),
        card(Suit::Diamonds, 7),
    ]);
    assert_eq!(
        table.place_bet(player, 10).unwrap_err(),
        BetError::DeckExhausted
    );

    let record = table.player(player).unwrap();
    assert_eq!(record.balance, 1000);
    assert_eq!(record.bet, 0);
    assert_eq!(table.phase(), Phase::Betting);
}

#[test]
fn empty_deck_on_hit_aborts_round() {
    let mut table = table();
    let player = seat(&mut table, 1);

    table.preset_next_deck(&[
        card(Suit::Hearts, 5),
        card(Suit::Clubs, 9),
        card(Suit::Spades, 6),
        card(Suit::Diamonds, 7),
    ]);
    table.place_bet(player, 10).unwrap();

    assert_eq!(table.hit(player).unwrap_err(), ActionError::DeckExhausted);
    assert_eq!(table.phase(), Phase::Betting);
    assert_eq!(table.player(player).unwrap().balance, 1000);
    assert!(table.dealer_hand().is_empty());
}

#[test]
fn empty_deck_on_dealer_draw_aborts_round() {
    let mut table = table();
    let player = seat(&mut table, 1);

    table.preset_next_deck(&[
        card(Suit::Hearts, 10),
        card(Suit::Clubs, 2),
        card(Suit::Spades, 9),
        card(Suit::Diamonds, 3),
    ]);
    table.place_bet(player, 10).unwrap();
    table.stand(player).unwrap();

    assert_eq!(
        table.dealer_play().unwrap_err(),
        ShowdownError::DeckExhausted
    );
    assert_eq!(table.phase(), Phase::Betting);
    assert_eq!(table.player(player).unwrap().balance, 1000);
}

#[test]
fn next_round_reshuffles_a_full_deck() {
    let mut table = table();
    let player = seat(&mut table, 1);

    table.place_bet(player, 10).unwrap();
    while table.phase() == Phase::PlayerTurn {
        table.stand(player).unwrap();
    }
    if table.phase() == Phase::DealerTurn {
        table.dealer_play().unwrap();
    }
    table.finish_round().unwrap();

    table.place_bet(player, 10).unwrap();
    assert_eq!(table.player(player).unwrap().hand.len(), 2);
    assert_eq!(table.cards_remaining(), Deck::standard().len() - 4);
}

#[test]
fn same_seed_same_deal() {
    let deal = |seed| {
        let mut table = Table::new(TableOptions::default(), seed);
        let player = table.connect(ConnectionId(1)).unwrap().id;
        table.place_bet(player, 10).unwrap();
        table.player(player).unwrap().hand.clone()
    };

    assert_eq!(deal(99), deal(99));
}

#[test]
fn broke_player_does_not_hold_up_betting() {
    let mut table = table();
    let broke = seat(&mut table, 1);
    let other = seat(&mut table, 2);

    table.preset_next_deck(&[
        card(Suit::Spades, 10),   // broke
        card(Suit::Hearts, 10),   // other
        card(Suit::Clubs, 10),    // dealer up
        card(Suit::Spades, 8),    // broke
        card(Suit::Hearts, 8),    // other
        card(Suit::Diamonds, 10), // dealer hole
    ]);
    table.place_bet(broke, 1000).unwrap();
    table.place_bet(other, 100).unwrap();
    table.stand(broke).unwrap();
    table.stand(other).unwrap();
    table.dealer_play().unwrap();
    table.finish_round().unwrap();

    assert_eq!(table.player(broke).unwrap().balance, 0);
    assert_eq!(
        table.place_bet(broke, 1).unwrap_err(),
        BetError::InsufficientFunds
    );

    assert_eq!(
        table.place_bet(other, 100).unwrap(),
        BetOutcome::RoundStarted
    );
    assert_eq!(table.turn_order(), &[other]);
    assert!(table.player(broke).unwrap().hand.is_empty());
}

#[test]
fn entropy_seeded_table_deals_a_full_deck() {
    let mut table = Table::from_entropy(TableOptions::default()).unwrap();
    assert_eq!(table.phase(), Phase::Betting);

    let player = seat(&mut table, 1);
    table.place_bet(player, 10).unwrap();
    assert_eq!(table.cards_remaining(), Deck::standard().len() - 4);
}

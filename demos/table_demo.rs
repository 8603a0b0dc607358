//! Plays a few rounds between bots on one table and prints every broadcast.

use bjtable::gateway::TableGateway;
use bjtable::{ClientEvent, ConnectionId, Phase, PlayerId, ServerEvent, Table, TableOptions};
use pico_args::Arguments;
use tokio::sync::broadcast::error::RecvError;

const HELP: &str = "\
Run a blackjack table with bot players

USAGE:
  table_demo [OPTIONS]

OPTIONS:
  --players    N     Number of bots to seat          [default: 2]
  --rounds     N     Rounds to play before exiting   [default: 3]
  --seed       N     Shuffle seed                    [default: from the OS]
  --pause-ms   N     Pause between dealer draws      [default: 200]
  --bet        N     Bet each bot places per round   [default: 50]

FLAGS:
  -h, --help         Print help information

ENVIRONMENT:
  RUST_LOG           Log filter, e.g. bjtable=debug
";

struct Args {
    players: u64,
    rounds: usize,
    seed: Option<u64>,
    pause_ms: u64,
    bet: u64,
}

struct Bot {
    connection: ConnectionId,
    id: PlayerId,
}

/// Takes the next bot action. Returns `false` once a bot can no longer
/// cover the fixed bet.
fn act(gateway: &TableGateway, bots: &[Bot], bet: Option<u64>) -> bool {
    let view = gateway.snapshot();
    match view.phase {
        Phase::Betting => {
            let Some(bet) = bet else {
                return true;
            };
            for bot in bots {
                let Some(seat) = view.player(bot.id) else {
                    continue;
                };
                if seat.bet > 0 {
                    continue;
                }
                if seat.balance < bet {
                    log::warn!("{} cannot cover a bet of {bet}", seat.name);
                    return false;
                }
                send(gateway, bot, ClientEvent::PlaceBet { amount: bet });
            }
        }
        Phase::PlayerTurn => {
            let Some(bot) = bots.iter().find(|b| Some(b.id) == view.turn_id) else {
                return true;
            };
            let score = view.player(bot.id).map_or(0, |p| p.score);
            let event = if score < 17 {
                ClientEvent::PlayerHit
            } else {
                ClientEvent::PlayerStand
            };
            send(gateway, bot, event);
        }
        Phase::Dealing | Phase::DealerTurn | Phase::Results => {}
    }
    true
}

fn send(gateway: &TableGateway, bot: &Bot, event: ClientEvent) {
    if let Some(ServerEvent::Error { message }) = gateway.dispatch(bot.connection, event) {
        log::warn!("{} was refused: {message}", bot.connection);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        players: pargs.opt_value_from_str("--players")?.unwrap_or(2),
        rounds: pargs.opt_value_from_str("--rounds")?.unwrap_or(3),
        seed: pargs.opt_value_from_str("--seed")?,
        pause_ms: pargs.opt_value_from_str("--pause-ms")?.unwrap_or(200),
        bet: pargs.opt_value_from_str("--bet")?.unwrap_or(50),
    };

    let options = TableOptions::default()
        .with_max_players(args.players.try_into()?)
        .with_dealer_pause_ms(args.pause_ms);
    let table = match args.seed {
        Some(seed) => Table::new(options, seed),
        None => Table::from_entropy(options)?,
    };
    let gateway = TableGateway::new(table);
    let mut updates = gateway.subscribe();

    let mut bots = Vec::new();
    for n in 1..=args.players {
        let connection = ConnectionId(n);
        let init = gateway.connect(connection)?;
        bots.push(Bot {
            connection,
            id: init.id,
        });
        println!("{}", serde_json::to_string(&ServerEvent::PlayerInit(init))?);
    }

    let mut rounds_played = 0;
    let mut running = act(&gateway, &bots, (args.rounds > 0).then_some(args.bet));

    while running {
        let event = match updates.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                log::warn!("missed {skipped} updates");
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        println!("{}", serde_json::to_string(&event)?);

        if let ServerEvent::GameStateUpdate(view) = &event {
            if view.phase == Phase::Results {
                rounds_played += 1;
                log::info!("round {rounds_played} of {} settled", args.rounds);
            }
            if rounds_played >= args.rounds && view.phase == Phase::Betting {
                break;
            }
        }

        let next_bet = (rounds_played < args.rounds).then_some(args.bet);
        running = act(&gateway, &bots, next_bet);
    }

    for bot in &bots {
        let departure = gateway.disconnect(bot.connection)?;
        log::info!(
            "{} leaves with {}",
            departure.player.name,
            departure.player.balance
        );
    }

    Ok(())
}

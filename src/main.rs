//! # Dicebound Main Entry Point
//!
//! Builds a game from command line options or a JSON config file, then either
//! auto-plays it or reads text commands from stdin.

use clap::Parser;
use dicebound::{
    AutoplayState, Clock, DiceboundResult, GameCompletionState, GameConfig, GameEvent, GameState,
    InputHandler, MapRecipe, PlayerInput, RandomDice, SystemClock, HELP_TEXT,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
#[cfg(feature = "dev-tools")]
use tracing::{error, info, Level};

#[cfg(not(feature = "dev-tools"))]
use log::{error, info};

/// Command line arguments for Dicebound.
#[derive(Parser, Debug)]
#[command(name = "dicebound")]
#[command(about = "A turn-based fantasy board game: dice, terrain, chance cards and duels")]
#[command(version)]
struct Args {
    /// Random seed for map generation and dice
    #[arg(short, long)]
    seed: Option<u64>,

    /// Map recipe, by id (1-15) or name
    #[arg(short, long)]
    recipe: Option<MapRecipe>,

    /// Board width in cells
    #[arg(long)]
    width: Option<u32>,

    /// Board height in cells
    #[arg(long)]
    height: Option<u32>,

    /// JSON configuration file; command line options override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop autoplay after this many turns
    #[arg(long, default_value_t = 500)]
    max_turns: u32,

    /// Read commands from stdin instead of auto-playing
    #[arg(short, long)]
    interactive: bool,

    /// Print events as JSON lines
    #[arg(long)]
    json: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> DiceboundResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);
    info!("Starting Dicebound v{}", dicebound::VERSION);

    let config = build_config(&args)?;
    info!("Using seed {}", config.seed);

    let dice = RandomDice::new(config.seed.wrapping_add(1));
    let mut game = GameState::new(&config, Box::new(dice))?;
    let events = game.begin()?;
    report(&events, &game, args.json);

    if args.interactive {
        run_interactive(&mut game, args.json)?;
    } else {
        run_autoplay(&mut game, args.max_turns, args.json)?;
    }

    summarize(&game, args.json)
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .with_writer(io::stderr)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .format_target(false)
            .init();
    }
}

/// Loads the config file if given and applies command line overrides.
fn build_config(args: &Args) -> DiceboundResult<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::new(rand::random()),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(recipe) = args.recipe {
        config.recipe = Some(recipe);
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }

    config.validate()?;
    Ok(config)
}

fn run_autoplay(game: &mut GameState, max_turns: u32, json: bool) -> DiceboundResult<()> {
    info!("Auto-playing up to {} turns", max_turns);
    let mut autoplay = AutoplayState::aggressive();
    let mut stdout = io::stdout().lock();

    while !game.is_over() && game.turn_number() <= max_turns {
        let events = autoplay.step(game)?;
        if events.is_empty() && game.active_character().is_none() {
            break;
        }
        for event in &events {
            // Stdout may be a closed pipe; the game keeps going regardless
            let _ = writeln!(stdout, "{}", format_event(event, game, json));
        }
    }
    Ok(())
}

fn run_interactive(game: &mut GameState, json: bool) -> DiceboundResult<()> {
    let clock = SystemClock::new();
    let handler = InputHandler::new();
    println!("{}", HELP_TEXT);
    print_status(game, &clock);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let expired = game.tick(clock.now())?;
        report(&expired, game, json);
        if game.is_over() {
            break;
        }

        let input = match handler.parse(&line) {
            Ok(input) => input,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match input {
            PlayerInput::Quit => {
                info!("Player quit the game");
                break;
            }
            PlayerInput::Help => println!("{}", HELP_TEXT),
            PlayerInput::Status => print_status(game, &clock),
            PlayerInput::ShowBoard => println!("{}", render_board(game)),
            _ => {
                let Some(command) = handler.input_to_command(input, game)? else {
                    continue;
                };
                match game.apply(command) {
                    Ok(events) => report(&events, game, json),
                    Err(e) => println!("Rejected: {}", e),
                }
            }
        }

        if game.is_over() {
            break;
        }
        print_status(game, &clock);
    }
    Ok(())
}

fn summarize(game: &GameState, json: bool) -> DiceboundResult<()> {
    match game.completion_state() {
        GameCompletionState::Victory { winner } => {
            let name = character_name(game, winner);
            info!("{} won on turn {}", name, game.turn_number());
        }
        GameCompletionState::AllDefeated => info!("Everyone has fallen"),
        GameCompletionState::Playing => info!("Stopped after {} turns", game.turn_number()),
    }

    if json {
        println!("{}", serde_json::to_string(game.statistics())?);
    } else {
        println!("{}", render_board(game));
        println!("{:#?}", game.statistics());
    }
    Ok(())
}

fn report(events: &[GameEvent], game: &GameState, json: bool) {
    for event in events {
        println!("{}", format_event(event, game, json));
    }
}

fn format_event(event: &GameEvent, game: &GameState, json: bool) -> String {
    if json {
        return match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                error!("Could not serialize event: {}", e);
                String::new()
            }
        };
    }

    let name = |id| character_name(game, id);
    match event {
        GameEvent::GameStarted {
            seed,
            recipe,
            width,
            height,
            ..
        } => format!("New {}x{} game on {} (seed {})", width, height, recipe, seed),
        GameEvent::TurnStarted { character, turn } => {
            format!("-- Turn {}: {} --", turn, name(*character))
        }
        GameEvent::PhaseChanged { phase } => format!("Phase: {:?}", phase),
        GameEvent::DiceRolled { character, points } => {
            format!("{} rolls {} movement points", name(*character), points)
        }
        GameEvent::CharacterMoved {
            character,
            to,
            cost,
            remaining,
            ..
        } => format!(
            "{} moves to {} (cost {}, {} left)",
            name(*character),
            to,
            cost,
            remaining
        ),
        GameEvent::HazardDamage {
            character,
            terrain,
            damage,
        } => format!("{} takes {} damage from {:?}", name(*character), damage, terrain),
        GameEvent::BattleStarted {
            attacker, defender, ..
        } => format!("{} attacks {}!", name(*attacker), name(*defender)),
        GameEvent::BattleResolved { record } => match record.winner {
            Some(winner) => format!(
                "{} wins the battle {}-{}",
                name(winner),
                record.attacker_wins.max(record.defender_wins),
                record.attacker_wins.min(record.defender_wins)
            ),
            None => format!(
                "The battle is a draw {}-{}",
                record.attacker_wins, record.defender_wins
            ),
        },
        GameEvent::TreasureTransferred { from, to, count } => {
            format!("{} takes {} treasures from {}", name(*to), count, name(*from))
        }
        GameEvent::CharacterDied { character, position } => {
            format!("{} dies at {}", name(*character), position)
        }
        GameEvent::ItemPickedUp { character, item } => {
            format!("{} picks up {}", name(*character), item.name)
        }
        GameEvent::TrapTriggered { character, damage } => {
            format!("A trap hits {} for {}", name(*character), damage)
        }
        GameEvent::Healed { character, amount } => {
            format!("{} recovers {} health", name(*character), amount)
        }
        GameEvent::ChanceCardDrawn { character, card } => {
            format!("{} draws: {}", name(*character), card.description)
        }
        GameEvent::Teleported { character, to, .. } => {
            format!("{} is teleported to {}", name(*character), to)
        }
        GameEvent::AbilityUsed { character, ability } => {
            format!("{} uses {}", name(*character), ability.name())
        }
        GameEvent::ItemsReplenished { count } => format!("{} new items appear", count),
        GameEvent::TimerExpired { character } => {
            format!("{} ran out of time", name(*character))
        }
        GameEvent::TurnEnded { character, .. } => format!("{} ends the turn", name(*character)),
        GameEvent::Victory { winner, treasures } => {
            format!("{} wins with {} treasures!", name(*winner), treasures)
        }
        GameEvent::AllDefeated => "Everyone has fallen".to_string(),
    }
}

fn character_name(game: &GameState, id: dicebound::CharacterId) -> String {
    game.character(id)
        .map(|character| format!("{} the {:?}", character.name, character.class))
        .unwrap_or_else(|| id.to_string())
}

fn print_status(game: &GameState, clock: &SystemClock) {
    let Some(active) = game.active_character() else {
        return;
    };
    println!(
        "{} | HP {}/{} | treasures {}/{} | phase {:?} | moves {} | {}s left",
        character_name(game, active.id),
        active.health(),
        active.max_health(),
        active.treasure_count(),
        game.victory_treasures(),
        game.phase(),
        active
            .movement_points
            .map_or_else(|| "-".to_string(), |points| points.to_string()),
        game.time_remaining(clock.now()).as_secs()
    );
}

/// ASCII view: heroes by turn slot, then items, then terrain.
fn render_board(game: &GameState) -> String {
    let board = game.board();
    let mut out = String::new();
    for y in 0..board.height as i32 {
        for x in 0..board.width as i32 {
            let Some(cell) = board.cell(dicebound::Position::new(x, y)) else {
                continue;
            };
            let glyph = if let Some(&id) = cell.occupants().first() {
                game.turn_order()
                    .iter()
                    .position(|&entry| entry == id)
                    .and_then(|slot| char::from_digit(slot as u32, 10))
                    .unwrap_or('@')
            } else if let Some(item) = cell.items().first() {
                item.kind.glyph()
            } else {
                cell.terrain().glyph()
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

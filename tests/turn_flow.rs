//! Turn order, timer expiry and full autoplayed games.

use dicebound::{
    AutoplayState, Board, Character, CharacterClass, Clock, DiceboundResult, GameCompletionState,
    GameConfig, GameEvent, GameState, ManualClock, MapRecipe, Position, RandomDice, ScriptedDice,
    TerrainKind, TurnPhase,
};
use std::time::Duration;

fn three_heroes(dice: ScriptedDice) -> DiceboundResult<(GameState, Vec<dicebound::CharacterId>)> {
    let config = GameConfig::for_testing(3);
    let mut game =
        GameState::from_board(Board::filled(7, 7, TerrainKind::Plain), &config, Box::new(dice));
    let mut ids = Vec::new();
    ids.push(game.add_character(Character::new("A", CharacterClass::Warrior, Position::new(1, 3)))?);
    let mut weak = Character::new("B", CharacterClass::Rogue, Position::new(2, 3));
    weak.take_damage(95);
    ids.push(game.add_character(weak)?);
    ids.push(game.add_character(Character::new("C", CharacterClass::Cleric, Position::new(5, 5)))?);
    Ok((game, ids))
}

fn island_board(size: i32, dry: &[Position]) -> Board {
    let mut map: dicebound::TerrainMap = (0..size)
        .flat_map(|x| (0..size).map(move |y| (Position::new(x, y), TerrainKind::Water)))
        .collect();
    for &pos in dry {
        map.insert(pos, TerrainKind::Plain);
    }
    Board::from_terrain(size as u32, size as u32, MapRecipe::Custom, &map)
}

#[test]
fn test_setup_stacks_heroes_when_only_the_center_is_dry() -> DiceboundResult<()> {
    let center = Position::new(2, 2);
    let config = GameConfig::for_testing(11);
    let mut game = GameState::with_heroes(
        island_board(5, &[center]),
        &config,
        Box::new(ScriptedDice::new([1])),
    );

    assert_eq!(game.characters().len(), 4);
    assert_eq!(game.turn_order().len(), 4);
    assert!(game.characters().iter().all(|c| c.position == center));
    assert_eq!(game.cell(center).map(|cell| cell.occupants().len()), Some(4));

    game.begin()?;
    let first = game.active_id();
    game.roll_dice()?;
    game.end_movement()?;
    game.end_turn()?;
    assert_ne!(game.active_id(), first);
    assert_eq!(game.living_characters().count(), 4);
    Ok(())
}

#[test]
fn test_setup_spreads_heroes_over_scarce_dry_cells() {
    let dry = [
        Position::new(3, 3),
        Position::new(2, 3),
        Position::new(3, 2),
        Position::new(4, 4),
    ];
    let config = GameConfig::for_testing(12);
    let game = GameState::with_heroes(
        island_board(7, &dry),
        &config,
        Box::new(ScriptedDice::default()),
    );

    let mut positions: Vec<Position> = game.characters().iter().map(|c| c.position).collect();
    positions.sort();
    let mut expected = dry.to_vec();
    expected.sort();
    assert_eq!(positions, expected);
}

#[test]
fn test_turns_cycle_in_order() -> DiceboundResult<()> {
    let (mut game, ids) = three_heroes(ScriptedDice::default())?;
    game.begin()?;

    for expected in [ids[0], ids[1], ids[2], ids[0]] {
        assert_eq!(game.active_id(), Some(expected));
        assert_eq!(game.phase(), TurnPhase::Selection);
        game.end_turn()?;
    }
    assert_eq!(game.turn_number(), 5);
    assert_eq!(game.statistics().turns_played, 4);
    Ok(())
}

#[test]
fn test_order_survives_a_death() -> DiceboundResult<()> {
    let (mut game, ids) = three_heroes(ScriptedDice::new([1, 20, 1, 20, 1, 20, 1]))?;
    game.begin()?;
    game.roll_dice()?;
    game.move_active(Position::new(2, 3))?;

    assert_eq!(game.turn_order(), &[ids[0], ids[2]]);
    assert_eq!(game.active_id(), Some(ids[2]));
    game.end_turn()?;
    assert_eq!(game.active_id(), Some(ids[0]));
    Ok(())
}

#[test]
fn test_timer_expiry_ends_turn_once() -> DiceboundResult<()> {
    let (mut game, ids) = three_heroes(ScriptedDice::default())?;
    let mut clock = ManualClock::new();
    game.begin()?;

    clock.advance(Duration::from_secs(34));
    assert!(game.tick(clock.now())?.is_empty());
    assert_eq!(game.time_remaining(clock.now()), Duration::from_secs(1));

    clock.advance(Duration::from_secs(1));
    let events = game.tick(clock.now())?;
    assert_eq!(events[0], GameEvent::TimerExpired { character: ids[0] });
    let turn_starts = events
        .iter()
        .filter(|e| matches!(e, GameEvent::TurnStarted { .. }))
        .count();
    assert_eq!(turn_starts, 1);
    assert_eq!(game.active_id(), Some(ids[1]));

    // Same instant again: no second advance
    assert!(game.tick(clock.now())?.is_empty());
    assert_eq!(game.active_id(), Some(ids[1]));
    assert_eq!(game.time_remaining(clock.now()), Duration::from_secs(35));
    assert_eq!(game.statistics().timer_expirations, 1);
    Ok(())
}

#[test]
fn test_timer_expiry_mid_movement_resets_roll() -> DiceboundResult<()> {
    let (mut game, ids) = three_heroes(ScriptedDice::new([3]))?;
    game.begin()?;
    game.roll_dice()?;
    assert_eq!(game.phase(), TurnPhase::Movement);

    game.tick(Duration::from_secs(40))?;
    let first = game.character(ids[0]).unwrap();
    assert!(!first.has_rolled);
    assert!(first.movement_points.is_none());
    assert!(first.reachable.is_empty());
    assert_eq!(game.phase(), TurnPhase::Selection);
    Ok(())
}

#[test]
fn test_generated_game_autoplays_to_an_end() -> DiceboundResult<()> {
    for seed in [1u64, 2, 3] {
        let config = GameConfig::new(seed).with_size(15, 15).with_recipe(MapRecipe::RoyalPlains);
        let mut game = GameState::new(&config, Box::new(RandomDice::new(seed)))?;
        game.begin()?;

        let mut autoplay = AutoplayState::aggressive();
        let mut violations = Vec::new();
        let mut battles = 0u32;
        while !game.is_over() && game.turn_number() <= 3000 {
            let events = autoplay.step(&mut game)?;
            battles += events
                .iter()
                .filter(|e| matches!(e, GameEvent::BattleResolved { .. }))
                .count() as u32;

            for character in game.characters() {
                if character.health() > character.max_health() {
                    violations.push(format!("{} over max health", character.name));
                }
            }
            if game.board().cells().any(|cell| cell.occupants().len() > 2) {
                violations.push("cell with three occupants".to_string());
            }
            if game.board().item_count() > config.item_target {
                violations.push("too many items".to_string());
            }
        }

        assert!(violations.is_empty(), "seed {}: {:?}", seed, violations);
        assert_eq!(game.statistics().battles_fought, battles);
        match game.completion_state() {
            GameCompletionState::Victory { winner } => {
                let winner = game.character(winner).unwrap();
                assert!(winner.is_alive());
                assert!(winner.treasure_count() >= config.victory_treasures);
            }
            GameCompletionState::AllDefeated => assert!(game.turn_order().is_empty()),
            GameCompletionState::Playing => assert!(game.turn_number() > 3000),
        }
    }
    Ok(())
}

#[test]
fn test_same_seed_same_game() -> DiceboundResult<()> {
    let config = GameConfig::for_testing(99);
    let a = GameState::new(&config, Box::new(RandomDice::new(1)))?;
    let b = GameState::new(&config, Box::new(RandomDice::new(1)))?;

    let layout = |game: &GameState| -> Vec<(Position, TerrainKind, usize)> {
        game.board()
            .cells()
            .map(|cell| (cell.position, cell.terrain(), cell.items().len()))
            .collect()
    };
    assert_eq!(layout(&a), layout(&b));

    let positions = |game: &GameState| -> Vec<Position> {
        game.turn_order()
            .iter()
            .filter_map(|&id| game.character(id))
            .map(|character| character.position)
            .collect()
    };
    assert_eq!(positions(&a), positions(&b));
    Ok(())
}

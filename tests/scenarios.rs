//! End-to-end scenarios driven through the public `GameState` surface.

use dicebound::{
    Board, Character, CharacterClass, CharacterId, DiceboundResult, GameCompletionState,
    GameConfig, GameEvent, GameState, Item, ItemGenerator, MapRecipe, Position, ScriptedDice,
    TerrainKind, TerrainMap, TurnPhase,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn game_on(board: Board, dice: ScriptedDice) -> GameState {
    GameState::from_board(board, &GameConfig::for_testing(7), Box::new(dice))
}

fn with_treasures(mut character: Character, count: usize) -> Character {
    for _ in 0..count {
        character.inventory.push(Item::treasure(character.position));
    }
    character
}

fn health(game: &GameState, id: CharacterId) -> u32 {
    game.character(id).map(|c| c.health()).unwrap_or_default()
}

#[test]
fn test_movement_roll_and_reachable_diamond() -> DiceboundResult<()> {
    let mut game = game_on(Board::filled(5, 5, TerrainKind::Plain), ScriptedDice::new([4]));
    let hero = game.add_character(Character::new("Mira", CharacterClass::Mage, Position::new(2, 2)))?;
    game.begin()?;

    let events = game.roll_dice()?;
    assert_eq!(events[0], GameEvent::DiceRolled { character: hero, points: 4 });

    let reachable = game.reachable(hero).unwrap();
    assert_eq!(reachable.len(), 24);
    assert!(!reachable.contains(&Position::new(2, 2)));
    for pos in reachable {
        assert!(Position::new(2, 2).manhattan_distance(*pos) <= 4);
    }
    Ok(())
}

#[test]
fn test_battle_one_win_each_is_a_draw() -> DiceboundResult<()> {
    let dice = ScriptedDice::new([1, 18, 5, 3, 20, 10, 10]);
    let mut game = game_on(Board::filled(5, 5, TerrainKind::Plain), dice);
    let attacker =
        game.add_character(Character::new("Brann", CharacterClass::Warrior, Position::new(1, 2)))?;
    let defender =
        game.add_character(Character::new("Kael", CharacterClass::Warrior, Position::new(2, 2)))?;
    game.begin()?;
    game.roll_dice()?;

    let events = game.move_active(Position::new(2, 2))?;
    assert!(events.contains(&GameEvent::BattleStarted {
        attacker,
        defender,
        position: Position::new(2, 2),
    }));

    let record = game.last_battle().unwrap();
    assert_eq!(record.rounds.len(), 3);
    assert_eq!((record.attacker_wins, record.defender_wins), (1, 1));
    assert!(record.is_draw());
    assert_eq!(record.rounds[2].damage, 0);
    assert_eq!(health(&game, defender), 90);
    assert_eq!(health(&game, attacker), 90);

    // Both stay on the contested cell; the attacker's roll is spent
    assert_eq!(game.cell(Position::new(2, 2)).unwrap().occupants().len(), 2);
    assert_eq!(game.phase(), TurnPhase::Action);
    assert_eq!(game.completion_state(), GameCompletionState::Playing);
    Ok(())
}

#[test]
fn test_mage_attacker_hits_harder() -> DiceboundResult<()> {
    let dice = ScriptedDice::new([1, 18, 5, 3, 20, 10, 10]);
    let mut game = game_on(Board::filled(5, 5, TerrainKind::Plain), dice);
    let attacker =
        game.add_character(Character::new("Mira", CharacterClass::Mage, Position::new(1, 2)))?;
    let defender =
        game.add_character(Character::new("Kael", CharacterClass::Warrior, Position::new(2, 2)))?;
    game.begin()?;
    game.roll_dice()?;
    game.move_active(Position::new(2, 2))?;

    assert_eq!(health(&game, defender), 85);
    assert_eq!(health(&game, attacker), 90);
    Ok(())
}

#[test]
fn test_kill_transfers_half_the_treasures() -> DiceboundResult<()> {
    let dice = ScriptedDice::new([1, 20, 1, 20, 1, 20, 1]);
    let mut game = game_on(Board::filled(5, 5, TerrainKind::Plain), dice);
    let attacker =
        game.add_character(Character::new("Brann", CharacterClass::Warrior, Position::new(1, 2)))?;
    let mut victim = with_treasures(
        Character::new("Kael", CharacterClass::Rogue, Position::new(2, 2)),
        3,
    );
    victim.take_damage(95);
    let defender = game.add_character(victim)?;
    game.begin()?;
    game.roll_dice()?;

    let events = game.move_active(Position::new(2, 2))?;
    assert!(events.contains(&GameEvent::TreasureTransferred {
        from: defender,
        to: attacker,
        count: 2,
    }));
    assert!(events.contains(&GameEvent::CharacterDied {
        character: defender,
        position: Position::new(2, 2),
    }));

    assert_eq!(game.character(attacker).unwrap().treasure_count(), 2);
    assert_eq!(game.character(defender).unwrap().treasure_count(), 1);
    assert_eq!(game.turn_order(), &[attacker]);
    assert_eq!(game.cell(Position::new(2, 2)).unwrap().occupants(), &[attacker]);

    // The killer's turn ends at once
    assert!(events.iter().any(|e| matches!(e, GameEvent::TurnEnded { .. })));
    assert_eq!(game.turn_number(), 2);
    assert_eq!(game.phase(), TurnPhase::Selection);
    Ok(())
}

#[test]
fn test_kill_of_treasureless_character_has_no_transfer() -> DiceboundResult<()> {
    let dice = ScriptedDice::new([1, 20, 1, 20, 1, 20, 1]);
    let mut game = game_on(Board::filled(5, 5, TerrainKind::Plain), dice);
    game.add_character(Character::new("Brann", CharacterClass::Warrior, Position::new(1, 2)))?;
    let mut victim = Character::new("Kael", CharacterClass::Rogue, Position::new(2, 2));
    victim.take_damage(95);
    game.add_character(victim)?;
    game.begin()?;
    game.roll_dice()?;

    let events = game.move_active(Position::new(2, 2))?;
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::TreasureTransferred { .. })));
    assert_eq!(game.statistics().characters_died, 1);
    Ok(())
}

#[test]
fn test_victory_on_transfer() -> DiceboundResult<()> {
    let dice = ScriptedDice::new([1, 20, 1, 20, 1, 20, 1]);
    let mut game = game_on(Board::filled(5, 5, TerrainKind::Plain), dice);
    let attacker = game.add_character(with_treasures(
        Character::new("Brann", CharacterClass::Warrior, Position::new(1, 2)),
        3,
    ))?;
    let mut victim = with_treasures(
        Character::new("Kael", CharacterClass::Rogue, Position::new(2, 2)),
        4,
    );
    victim.take_damage(95);
    game.add_character(victim)?;
    game.begin()?;
    game.roll_dice()?;

    let events = game.move_active(Position::new(2, 2))?;
    assert_eq!(
        events.last(),
        Some(&GameEvent::Victory { winner: attacker, treasures: 5 })
    );
    assert_eq!(
        game.completion_state(),
        GameCompletionState::Victory { winner: attacker }
    );
    assert!(game.end_turn().is_err());
    assert!(game.roll_dice().is_err());
    Ok(())
}

#[test]
fn test_victory_on_crossing_pickup() -> DiceboundResult<()> {
    let mut game = game_on(Board::filled(7, 7, TerrainKind::Plain), ScriptedDice::new([1]));
    let hero = game.add_character(with_treasures(
        Character::new("Sel", CharacterClass::Cleric, Position::new(3, 3)),
        4,
    ))?;
    game.place_item(Item::treasure(Position::new(3, 3)));
    game.begin()?;
    game.roll_dice()?;
    game.end_movement()?;

    let events = game.pickup()?;
    assert_eq!(
        events.last(),
        Some(&GameEvent::Victory { winner: hero, treasures: 5 })
    );
    assert!(game.is_over());
    Ok(())
}

#[test]
fn test_pickup_keeps_ten_items_on_board() -> DiceboundResult<()> {
    let mut board = Board::filled(9, 9, TerrainKind::Plain);
    let mut rng = StdRng::seed_from_u64(11);
    let stocked = ItemGenerator::default().replenish(&mut board, &mut rng);
    assert_eq!(board.item_count(), 10);
    let spot = stocked[0].position;

    let mut game = game_on(board, ScriptedDice::new([1]));
    game.add_character(Character::new("Ash", CharacterClass::Rogue, spot))?;
    game.begin()?;
    game.roll_dice()?;
    game.end_movement()?;
    game.pickup()?;

    assert_eq!(game.board().item_count(), 10);
    assert!(game.cell(spot).unwrap().items().is_empty());
    Ok(())
}

#[test]
fn test_hazard_does_not_apply_on_battle_cell() -> DiceboundResult<()> {
    let mut map = TerrainMap::new();
    for x in 0..5 {
        for y in 0..5 {
            map.insert(Position::new(x, y), TerrainKind::Plain);
        }
    }
    map.insert(Position::new(2, 2), TerrainKind::Lava);
    map.insert(Position::new(3, 2), TerrainKind::Lava);
    let board = Board::from_terrain(5, 5, MapRecipe::Custom, &map);

    let dice = ScriptedDice::new([6, 10, 10, 10, 10, 10, 10]);
    let mut game = game_on(board, dice);
    let walker =
        game.add_character(Character::new("Brann", CharacterClass::Warrior, Position::new(1, 2)))?;
    let sitter =
        game.add_character(Character::new("Kael", CharacterClass::Warrior, Position::new(3, 2)))?;
    game.begin()?;
    game.roll_dice()?;

    // Empty lava cell burns
    let events = game.move_active(Position::new(2, 2))?;
    assert!(events.contains(&GameEvent::HazardDamage {
        character: walker,
        terrain: TerrainKind::Lava,
        damage: 5,
    }));

    // Lava cell with an occupant starts a battle instead
    let events = game.move_active(Position::new(3, 2))?;
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::HazardDamage { .. })));
    assert_eq!(health(&game, walker), 95);
    assert_eq!(health(&game, sitter), 100);
    Ok(())
}

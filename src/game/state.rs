//! # Game State Module
//!
//! Central game state and the turn machine that coordinates every system.
//!
//! [`GameState`] owns the board, the roster, the dice and the turn timer.
//! Every command validates first and only then mutates, so a rejected
//! command leaves the game exactly as it was. Each accepted command returns
//! the [`GameEvent`]s it produced.

use crate::generation::{
    safe_spawn_points, utils, GameConfig, Generator, ItemGenerator, MapRecipe, TerrainGenerator,
};
use crate::input::Command;
use crate::{
    compute_reachable, draw_card, execute_move, reset_movement, resolve_battle, roll_movement,
    standard_deck, transfer_spoils, BattleRecord, Board, CardEffect, Cell, ChanceCard, Character,
    CharacterClass, CharacterId, DiceRoller, DiceboundError, DiceboundResult, GameEvent,
    GameStatistics, Item, ItemKind, MovementRules, Position, TerrainKind, TurnTimer,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Phases of a single turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Waiting for the active character to roll (or be swapped)
    Selection,
    /// Spending movement points
    Movement,
    /// Picking up items before passing the turn
    Action,
}

/// Game completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameCompletionState {
    /// Game is still in progress
    Playing,
    /// A character collected enough treasures
    Victory { winner: CharacterId },
    /// Nobody is left alive
    AllDefeated,
}

/// Central game state containing all game data and systems.
#[derive(Debug)]
pub struct GameState {
    board: Board,
    /// Every character ever placed, dead ones included
    characters: Vec<Character>,
    /// Living characters in play order
    turn_order: Vec<CharacterId>,
    turn_index: usize,
    active: Option<CharacterId>,
    phase: TurnPhase,
    turn_number: u32,
    started: bool,
    timer: TurnTimer,
    /// Latest timestamp seen by `tick`
    now: Duration,
    rules: MovementRules,
    items: ItemGenerator,
    victory_treasures: usize,
    deck: Vec<ChanceCard>,
    last_battle: Option<BattleRecord>,
    completion_state: GameCompletionState,
    statistics: GameStatistics,
    seed: u64,
    dice: Box<dyn DiceRoller>,
    rng: StdRng,
}

impl GameState {
    /// Generates a full game from a configuration: terrain, four heroes with
    /// class bonuses on safe spawn points, a shuffled turn order and the
    /// initial items. Call [`GameState::begin`] to start the first turn.
    pub fn new(config: &GameConfig, dice: Box<dyn DiceRoller>) -> DiceboundResult<Self> {
        config.validate()?;
        let mut rng = utils::create_rng(config);

        let recipe = config
            .recipe
            .unwrap_or_else(|| MapRecipe::random(&mut rng));
        let terrain = TerrainGenerator::new(recipe).generate(config, &mut rng)?;
        let board = Board::from_terrain(config.width, config.height, recipe, &terrain);
        info!(
            "Generated {}x{} board with recipe {}",
            config.width, config.height, recipe
        );

        Ok(Self::populate(board, config, dice, rng))
    }

    /// Sets up a game on a prepared board: four heroes with class bonuses on
    /// safe spawn points, a shuffled turn order and the initial items.
    pub fn with_heroes(board: Board, config: &GameConfig, dice: Box<dyn DiceRoller>) -> Self {
        let rng = utils::create_rng(config);
        Self::populate(board, config, dice, rng)
    }

    fn populate(board: Board, config: &GameConfig, dice: Box<dyn DiceRoller>, rng: StdRng) -> Self {
        let mut state = Self::assemble(board, config, dice, rng);

        // Boards with too few dry cells can stack heroes on the center
        let spawns = safe_spawn_points(&state.board);
        for (slot, (position, class)) in spawns.into_iter().zip(CharacterClass::all()).enumerate() {
            let hero = Character::with_class_bonuses(format!("Hero {}", slot + 1), class, position);
            state.place_character(hero);
        }
        state.turn_order.shuffle(&mut state.rng);

        let placed = state.items.replenish(&mut state.board, &mut state.rng);
        debug!("Initial item spawn: {} items", placed.len());
        state
    }

    /// Wraps an existing board with no characters. Turn order follows the
    /// order characters are added in.
    pub fn from_board(board: Board, config: &GameConfig, dice: Box<dyn DiceRoller>) -> Self {
        let rng = utils::create_rng(config);
        Self::assemble(board, config, dice, rng)
    }

    fn assemble(board: Board, config: &GameConfig, dice: Box<dyn DiceRoller>, rng: StdRng) -> Self {
        Self {
            board,
            characters: Vec::new(),
            turn_order: Vec::new(),
            turn_index: 0,
            active: None,
            phase: TurnPhase::Selection,
            turn_number: 0,
            started: false,
            timer: TurnTimer::new(config.turn_duration(), Duration::ZERO),
            now: Duration::ZERO,
            rules: config.rules,
            items: ItemGenerator::new(config.item_target),
            victory_treasures: config.victory_treasures,
            deck: standard_deck(),
            last_battle: None,
            completion_state: GameCompletionState::Playing,
            statistics: GameStatistics::new(),
            seed: config.seed,
            dice,
            rng,
        }
    }

    /// Places a character on the board and appends it to the turn order.
    pub fn add_character(&mut self, character: Character) -> DiceboundResult<CharacterId> {
        if self.started {
            return Err(DiceboundError::InvalidCommand(
                "characters can only be added before the game begins".to_string(),
            ));
        }
        let id = character.id;
        if !character.is_alive() {
            return Err(DiceboundError::CharacterDead(id));
        }
        let cell = self.board.cell(character.position).ok_or_else(|| {
            DiceboundError::InvalidConfig(format!("{} is off the board", character.position))
        })?;
        if !cell.is_enterable() {
            return Err(DiceboundError::InvalidConfig(format!(
                "{} is already full",
                character.position
            )));
        }

        Ok(self.place_character(character))
    }

    fn place_character(&mut self, character: Character) -> CharacterId {
        let id = character.id;
        self.board.add_occupant(character.position, id);
        self.turn_order.push(id);
        self.characters.push(character);
        id
    }

    /// Places an item on the board before or during play.
    pub fn place_item(&mut self, item: Item) -> bool {
        self.board.add_item(item)
    }

    /// Replaces the chance card deck.
    pub fn set_deck(&mut self, deck: Vec<ChanceCard>) {
        self.deck = deck;
    }

    /// Starts the first turn.
    pub fn begin(&mut self) -> DiceboundResult<Vec<GameEvent>> {
        if self.started {
            return Err(DiceboundError::InvalidCommand(
                "the game has already begun".to_string(),
            ));
        }
        let first = *self
            .turn_order
            .first()
            .ok_or_else(|| DiceboundError::InvalidConfig("no characters to play".to_string()))?;

        self.started = true;
        self.turn_index = 0;
        self.turn_number = 1;
        self.active = Some(first);
        self.phase = TurnPhase::Selection;
        self.timer.restart(self.now);
        info!("Game started with {} characters", self.turn_order.len());

        let events = vec![
            GameEvent::GameStarted {
                seed: self.seed,
                recipe: self.board.recipe,
                width: self.board.width,
                height: self.board.height,
                turn_order: self.turn_order.clone(),
            },
            GameEvent::TurnStarted {
                character: first,
                turn: self.turn_number,
            },
        ];
        Ok(self.finish(events))
    }

    // ----------------------------------------------------------------------
    // Commands
    // ----------------------------------------------------------------------

    /// Dispatches a parsed command.
    pub fn apply(&mut self, command: Command) -> DiceboundResult<Vec<GameEvent>> {
        self.ensure_playing()?;
        match command {
            Command::Roll => self.roll_dice(),
            Command::Move(destination) => self.move_active(destination),
            Command::EndMovement => self.end_movement(),
            Command::Pickup => self.pickup(),
            Command::UseAbility => self.use_ability(),
            Command::EndTurn => self.end_turn(),
            Command::Select(slot) => {
                let id = *self.turn_order.get(slot).ok_or_else(|| {
                    DiceboundError::InvalidCommand(format!("no character in turn slot {}", slot))
                })?;
                self.select_character(id)
            }
        }
    }

    /// Rolls movement for the active character and enters the Movement phase.
    pub fn roll_dice(&mut self) -> DiceboundResult<Vec<GameEvent>> {
        self.ensure_playing()?;
        let index = self.active_index()?;
        if self.characters[index].has_rolled {
            return Err(DiceboundError::AlreadyRolled);
        }
        self.ensure_phase("roll", TurnPhase::Selection)?;

        let character = &mut self.characters[index];
        let points = roll_movement(character, self.dice.as_mut());
        character.reachable = compute_reachable(&self.board, character, &self.rules);
        let id = character.id;

        let mut events = vec![GameEvent::DiceRolled {
            character: id,
            points,
        }];
        self.set_phase(TurnPhase::Movement, &mut events);
        Ok(self.finish(events))
    }

    /// Moves the active character to a reachable cell.
    ///
    /// Landing on another character starts a battle; otherwise the terrain
    /// hazard of the destination applies.
    pub fn move_active(&mut self, destination: Position) -> DiceboundResult<Vec<GameEvent>> {
        self.ensure_playing()?;
        let index = self.active_index()?;
        self.ensure_phase("move", TurnPhase::Movement)?;

        let outcome = execute_move(
            &mut self.board,
            &mut self.characters[index],
            destination,
            &self.rules,
        )?;
        let mover = self.characters[index].id;

        let mut events = vec![GameEvent::CharacterMoved {
            character: mover,
            from: outcome.from,
            to: outcome.to,
            cost: outcome.cost,
            remaining: outcome.remaining,
        }];

        if let Some(opponent) = outcome.opponent {
            self.fight(mover, opponent, outcome.to, &mut events)?;
        } else if outcome.hazard_damage > 0 {
            let terrain = self
                .board
                .cell(outcome.to)
                .map(Cell::terrain)
                .unwrap_or(TerrainKind::Plain);
            events.push(GameEvent::HazardDamage {
                character: mover,
                terrain,
                damage: outcome.hazard_damage,
            });
            if outcome.died {
                self.kill(mover, &mut events);
                self.end_turn_internal(&mut events);
            }
        }

        let still_moving = self.completion_state == GameCompletionState::Playing
            && self.active == Some(mover)
            && self.phase == TurnPhase::Movement;
        if still_moving && self.characters[index].movement_points == Some(0) {
            self.set_phase(TurnPhase::Action, &mut events);
        }

        Ok(self.finish(events))
    }

    /// Gives up the remaining movement points and enters the Action phase.
    pub fn end_movement(&mut self) -> DiceboundResult<Vec<GameEvent>> {
        self.ensure_playing()?;
        let index = self.active_index()?;
        self.ensure_phase("end movement", TurnPhase::Movement)?;

        reset_movement(&mut self.characters[index]);
        let mut events = Vec::new();
        self.set_phase(TurnPhase::Action, &mut events);
        Ok(self.finish(events))
    }

    /// Resolves the first item in the active character's cell.
    pub fn pickup(&mut self) -> DiceboundResult<Vec<GameEvent>> {
        self.ensure_playing()?;
        let index = self.active_index()?;
        self.ensure_phase("pickup", TurnPhase::Action)?;

        let position = self.characters[index].position;
        let item_id = self
            .board
            .cell(position)
            .and_then(|cell| cell.items().first())
            .map(|item| item.id)
            .ok_or(DiceboundError::NoItemHere(position))?;
        let item = self
            .board
            .remove_item(position, item_id)
            .ok_or(DiceboundError::NoItemHere(position))?;

        let id = self.characters[index].id;
        debug!("{} picked up {}", self.characters[index].name, item.name);
        let mut events = vec![GameEvent::ItemPickedUp {
            character: id,
            item: item.clone(),
        }];

        let mut lose_turn = false;
        let kind = item.kind;
        match kind {
            ItemKind::Treasure { .. } => self.characters[index].inventory.push(item),
            ItemKind::Trap { damage } => {
                events.push(GameEvent::TrapTriggered {
                    character: id,
                    damage,
                });
                self.characters[index].take_damage(damage);
            }
            ItemKind::HealthPotion { heal } => {
                let amount = self.characters[index].heal(heal);
                events.push(GameEvent::Healed {
                    character: id,
                    amount,
                });
            }
            ItemKind::MysteryCard => lose_turn = self.resolve_card(index, &mut events),
        }

        let placed = self.items.replenish(&mut self.board, &mut self.rng);
        if !placed.is_empty() {
            events.push(GameEvent::ItemsReplenished {
                count: placed.len(),
            });
        }

        if self.check_victory(id, &mut events) {
            return Ok(self.finish(events));
        }
        if !self.characters[index].is_alive() {
            self.kill(id, &mut events);
            self.end_turn_internal(&mut events);
        } else if lose_turn {
            self.end_turn_internal(&mut events);
        }

        Ok(self.finish(events))
    }

    /// Uses the active character's class ability. Allowed once per turn in
    /// the Selection or Movement phase, subject to the class cooldown.
    pub fn use_ability(&mut self) -> DiceboundResult<Vec<GameEvent>> {
        self.ensure_playing()?;
        let index = self.active_index()?;
        if self.phase == TurnPhase::Action {
            return Err(DiceboundError::WrongPhase {
                command: "use ability",
                phase: self.phase,
            });
        }
        let now = self.now;
        let character = &mut self.characters[index];

        if character.ability_used {
            return Err(DiceboundError::AbilityUsed);
        }
        if let Some(remaining) = character.ability_cooldown_remaining(now) {
            let remaining_secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
            return Err(DiceboundError::AbilityOnCooldown { remaining_secs });
        }

        let healed = character.activate_ability(now);
        let ability = character.class.ability();
        let id = character.id;
        info!("{} used {}", character.name, ability.name());

        let mut events = vec![GameEvent::AbilityUsed {
            character: id,
            ability,
        }];
        if character.class == CharacterClass::Cleric {
            events.push(GameEvent::Healed {
                character: id,
                amount: healed,
            });
        }
        Ok(self.finish(events))
    }

    /// Passes the turn to the next living character.
    pub fn end_turn(&mut self) -> DiceboundResult<Vec<GameEvent>> {
        self.ensure_playing()?;
        self.active_index()?;
        let mut events = Vec::new();
        self.end_turn_internal(&mut events);
        Ok(self.finish(events))
    }

    /// Hands the current turn to another living character. Only allowed in
    /// the Selection phase, before anyone has rolled.
    pub fn select_character(&mut self, id: CharacterId) -> DiceboundResult<Vec<GameEvent>> {
        self.ensure_playing()?;
        let current = self.active_index()?;
        self.ensure_phase("select", TurnPhase::Selection)?;
        if self.characters[current].has_rolled {
            return Err(DiceboundError::AlreadyRolled);
        }
        let target = self.index_of(id).ok_or(DiceboundError::UnknownCharacter(id))?;
        if !self.characters[target].is_alive() {
            return Err(DiceboundError::CharacterDead(id));
        }
        let slot = self
            .turn_order
            .iter()
            .position(|&entry| entry == id)
            .ok_or(DiceboundError::CharacterDead(id))?;

        if current != target {
            self.characters[current].reset_turn();
        }
        self.active = Some(id);
        self.turn_index = slot;
        self.timer.restart(self.now);
        info!("{} selected for turn {}", self.characters[target].name, self.turn_number);

        let events = vec![GameEvent::TurnStarted {
            character: id,
            turn: self.turn_number,
        }];
        Ok(self.finish(events))
    }

    /// Advances game time. Ends the active turn once when its deadline has
    /// passed and restarts the timer from `now`.
    pub fn tick(&mut self, now: Duration) -> DiceboundResult<Vec<GameEvent>> {
        self.ensure_playing()?;
        self.now = self.now.max(now);

        let mut events = Vec::new();
        if let Some(id) = self.active {
            if self.timer.is_expired(self.now) {
                info!("Turn timer expired on turn {}", self.turn_number);
                events.push(GameEvent::TimerExpired { character: id });
                self.end_turn_internal(&mut events);
            }
        }
        Ok(self.finish(events))
    }

    // ----------------------------------------------------------------------
    // Queries
    // ----------------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.board.cell(pos)
    }

    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        self.board.neighbors(pos)
    }

    /// Reachable set of a character; empty when it has no active roll.
    pub fn reachable(&self, id: CharacterId) -> Option<&HashSet<Position>> {
        self.character(id).map(|character| &character.reachable)
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn active_character(&self) -> Option<&Character> {
        self.active.and_then(|id| self.character(id))
    }

    pub fn active_id(&self) -> Option<CharacterId> {
        self.active
    }

    /// Time left in the current turn at `now`.
    pub fn time_remaining(&self, now: Duration) -> Duration {
        self.timer.remaining(now)
    }

    pub fn last_battle(&self) -> Option<&BattleRecord> {
        self.last_battle.as_ref()
    }

    pub fn completion_state(&self) -> GameCompletionState {
        self.completion_state
    }

    pub fn is_over(&self) -> bool {
        self.completion_state != GameCompletionState::Playing
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn turn_order(&self) -> &[CharacterId] {
        &self.turn_order
    }

    pub fn statistics(&self) -> &GameStatistics {
        &self.statistics
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.iter().find(|character| character.id == id)
    }

    /// All characters ever placed, dead ones included.
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn living_characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter().filter(|character| character.is_alive())
    }

    pub fn rules(&self) -> &MovementRules {
        &self.rules
    }

    pub fn victory_treasures(&self) -> usize {
        self.victory_treasures
    }

    /// Latest timestamp passed to `tick`.
    pub fn now(&self) -> Duration {
        self.now
    }

    // ----------------------------------------------------------------------
    // Internals
    // ----------------------------------------------------------------------

    fn ensure_playing(&self) -> DiceboundResult<()> {
        if self.is_over() {
            return Err(DiceboundError::GameOver);
        }
        Ok(())
    }

    fn ensure_phase(&self, command: &'static str, phase: TurnPhase) -> DiceboundResult<()> {
        if self.phase != phase {
            return Err(DiceboundError::WrongPhase {
                command,
                phase: self.phase,
            });
        }
        Ok(())
    }

    fn index_of(&self, id: CharacterId) -> Option<usize> {
        self.characters.iter().position(|character| character.id == id)
    }

    fn active_index(&self) -> DiceboundResult<usize> {
        let id = self.active.ok_or(DiceboundError::NoActiveCharacter)?;
        self.index_of(id).ok_or(DiceboundError::UnknownCharacter(id))
    }

    fn set_phase(&mut self, phase: TurnPhase, events: &mut Vec<GameEvent>) {
        if self.phase != phase {
            self.phase = phase;
            events.push(GameEvent::PhaseChanged { phase });
        }
    }

    /// Updates statistics from a finished command's events.
    fn finish(&mut self, events: Vec<GameEvent>) -> Vec<GameEvent> {
        for event in &events {
            self.statistics.update_from_event(event);
        }
        events
    }

    fn fight(
        &mut self,
        attacker: CharacterId,
        defender: CharacterId,
        position: Position,
        events: &mut Vec<GameEvent>,
    ) -> DiceboundResult<()> {
        let attacker_index = self
            .index_of(attacker)
            .ok_or(DiceboundError::UnknownCharacter(attacker))?;
        let defender_index = self
            .index_of(defender)
            .ok_or(DiceboundError::UnknownCharacter(defender))?;

        events.push(GameEvent::BattleStarted {
            attacker,
            defender,
            position,
        });
        let (a, d) = pair_mut(&mut self.characters, attacker_index, defender_index)
            .ok_or(DiceboundError::UnknownCharacter(defender))?;
        let record = resolve_battle(a, d, self.dice.as_mut());
        events.push(GameEvent::BattleResolved {
            record: record.clone(),
        });

        match (record.is_decisive(), record.winner, record.loser) {
            (true, Some(winner), Some(loser)) => {
                let (winner_index, loser_index) = if winner == attacker {
                    (attacker_index, defender_index)
                } else {
                    (defender_index, attacker_index)
                };
                if let Some((w, l)) = pair_mut(&mut self.characters, winner_index, loser_index) {
                    let spoils = transfer_spoils(w, l);
                    if !spoils.is_empty() {
                        info!("{} takes {} treasures from {}", w.name, spoils.len(), l.name);
                        events.push(GameEvent::TreasureTransferred {
                            from: loser,
                            to: winner,
                            count: spoils.len(),
                        });
                    }
                }
                self.kill(loser, events);
                self.check_victory(winner, events);
                self.end_turn_internal(events);
            }
            _ if record.casualties.len() > 1 => {
                for &casualty in &record.casualties {
                    self.kill(casualty, events);
                }
                self.end_turn_internal(events);
            }
            _ => {}
        }

        self.last_battle = Some(record);
        Ok(())
    }

    fn resolve_card(&mut self, index: usize, events: &mut Vec<GameEvent>) -> bool {
        let Some(card) = draw_card(&self.deck, &mut self.rng).cloned() else {
            return false;
        };
        let id = self.characters[index].id;
        debug!("{} drew '{}'", self.characters[index].name, card.description);
        events.push(GameEvent::ChanceCardDrawn {
            character: id,
            card: card.clone(),
        });

        match card.effect {
            CardEffect::GainLife(amount) => {
                let amount = self.characters[index].heal(amount);
                events.push(GameEvent::Healed {
                    character: id,
                    amount,
                });
            }
            CardEffect::LoseLife(amount) => {
                self.characters[index].take_damage(amount);
            }
            CardEffect::GainTrophy => {
                let position = self.characters[index].position;
                self.characters[index].inventory.push(Item::treasure(position));
            }
            CardEffect::LoseTurn => return true,
            CardEffect::Teleport => self.teleport(index, events),
        }
        false
    }

    /// Moves a character to a random free, dry cell.
    fn teleport(&mut self, index: usize, events: &mut Vec<GameEvent>) {
        let candidates: Vec<Position> = self
            .board
            .cells()
            .filter(|cell| !cell.is_occupied() && cell.terrain() != TerrainKind::Water)
            .map(|cell| cell.position)
            .collect();
        let Some(&to) = candidates.choose(&mut self.rng) else {
            return;
        };

        let character = &mut self.characters[index];
        let from = character.position;
        self.board.relocate_occupant(from, to, character.id);
        character.position = to;
        reset_movement(character);
        events.push(GameEvent::Teleported {
            character: character.id,
            from,
            to,
        });
    }

    fn check_victory(&mut self, id: CharacterId, events: &mut Vec<GameEvent>) -> bool {
        let Some(character) = self.character(id) else {
            return false;
        };
        let treasures = character.treasure_count();
        if !character.is_alive() || treasures < self.victory_treasures {
            return false;
        }

        info!("{} wins with {} treasures", character.name, treasures);
        self.completion_state = GameCompletionState::Victory { winner: id };
        events.push(GameEvent::Victory {
            winner: id,
            treasures,
        });
        true
    }

    /// Removes a dead character from the board and the turn order.
    fn kill(&mut self, id: CharacterId, events: &mut Vec<GameEvent>) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        let character = &mut self.characters[index];
        let position = character.position;
        self.board.remove_occupant(position, id);
        reset_movement(character);
        info!("{} died at {}", character.name, position);

        if let Some(slot) = self.turn_order.iter().position(|&entry| entry == id) {
            self.turn_order.remove(slot);
            if slot < self.turn_index {
                self.turn_index -= 1;
            } else if slot == self.turn_index {
                // Point at the predecessor so the next advance lands on the successor
                self.turn_index = match slot {
                    0 => self.turn_order.len().saturating_sub(1),
                    _ => slot - 1,
                };
            }
        }

        events.push(GameEvent::CharacterDied {
            character: id,
            position,
        });
    }

    fn end_turn_internal(&mut self, events: &mut Vec<GameEvent>) {
        if self.is_over() {
            return;
        }

        if let Some(id) = self.active {
            if let Some(index) = self.index_of(id) {
                let character = &mut self.characters[index];
                reset_movement(character);
                character.reset_turn();
            }
            events.push(GameEvent::TurnEnded {
                character: id,
                turn: self.turn_number,
            });
        }
        self.turn_number += 1;

        if self.turn_order.is_empty() {
            info!("All characters have fallen");
            self.active = None;
            self.completion_state = GameCompletionState::AllDefeated;
            events.push(GameEvent::AllDefeated);
            return;
        }

        self.turn_index = (self.turn_index + 1) % self.turn_order.len();
        let next = self.turn_order[self.turn_index];
        self.active = Some(next);
        self.timer.restart(self.now);
        self.set_phase(TurnPhase::Selection, events);
        info!("Turn {} begins", self.turn_number);
        events.push(GameEvent::TurnStarted {
            character: next,
            turn: self.turn_number,
        });
    }
}

/// Mutable references to two distinct characters.
fn pair_mut(characters: &mut [Character], a: usize, b: usize) -> Option<(&mut Character, &mut Character)> {
    if a == b || a >= characters.len() || b >= characters.len() {
        return None;
    }
    if a < b {
        let (left, right) = characters.split_at_mut(b);
        Some((&mut left[a], &mut right[0]))
    } else {
        let (left, right) = characters.split_at_mut(a);
        Some((&mut right[0], &mut left[b]))
    }
}

//! Simulation engine.
//!
//! `SimulationEngine` owns the hecs ECS world and the tile map, processes
//! player commands, runs all systems and produces `GameStateSnapshot`s.
//! Completely headless, which keeps it deterministic and testable.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use tileworld_core::commands::PlayerCommand;
use tileworld_core::components::{Mover, TilePosition, UnitInfo};
use tileworld_core::enums::{GamePhase, UnitType};
use tileworld_core::error::{Result, WorldError};
use tileworld_core::events::{Actor, GameEvent};
use tileworld_core::state::GameStateSnapshot;
use tileworld_core::types::{Position, SimTime, TileCoord, UnitId};
use tileworld_terrain::{TileMap, TileSet};

use crate::config::{ConfigError, SimConfig};
use crate::systems;
use crate::systems::camera::Camera;
use crate::systems::combat::DamageOutcome;
use crate::systems::input::ClickOutcome;
use crate::systems::movement::MoveOutcome;
use crate::systems::units::UnitIndex;
use crate::world_setup;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    map: TileMap,
    tiles: TileSet,
    camera: Camera,
    units: UnitIndex,
    player: Entity,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<GameEvent>,
}

impl SimulationEngine {
    /// Create an engine on the map described by `config`.
    pub fn new(config: SimConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let map = config.build_map()?;
        Self::with_map(config, map)
    }

    /// Create an engine on a prepared map. The map section of `config` is
    /// ignored.
    pub fn with_map(config: SimConfig, map: TileMap) -> std::result::Result<Self, ConfigError> {
        config.validate_settings()?;
        let tiles = config.tile_set();

        let mut world = World::new();
        let mut units = UnitIndex::new();
        let player = world_setup::spawn_player(&mut world, &map);
        if config.spawn_initial_units {
            world_setup::setup_initial_units(&mut world, &mut units, &map, &tiles);
        }

        let mut camera = Camera::new(config.viewport.width, config.viewport.height);
        systems::camera::run(&world, &mut camera, &map);

        info!(
            seed = config.seed,
            width = map.width(),
            height = map.height(),
            units = units.len(),
            "simulation created"
        );

        Ok(Self {
            world,
            map,
            tiles,
            camera,
            units,
            player,
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            events: Vec::new(),
        })
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.run_systems();
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        self.build_snapshot(events)
    }

    /// Snapshot of the current state without advancing. Pending events are
    /// included but not consumed.
    pub fn snapshot(&self) -> GameStateSnapshot {
        self.build_snapshot(self.events.clone())
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn map(&self) -> &TileMap {
        &self.map
    }

    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn units(&self) -> &UnitIndex {
        &self.units
    }

    pub fn player_entity(&self) -> Entity {
        self.player
    }

    /// The player's top-left position.
    pub fn player_position(&self) -> Position {
        self.world
            .get::<&Position>(self.player)
            .map(|p| *p)
            .unwrap_or_default()
    }

    // --- Player ---

    /// Handle a click on the canvas at screen coordinates.
    pub fn click(&mut self, screen_x: f64, screen_y: f64) -> ClickOutcome {
        let outcome = systems::input::handle_click(
            &mut self.world,
            &self.map,
            &self.tiles,
            &self.camera,
            self.player,
            screen_x,
            screen_y,
        );
        match outcome {
            ClickOutcome::Move { tile, outcome } => self.record_move(Actor::Player, tile, outcome),
            ClickOutcome::UiArea | ClickOutcome::OutOfBounds(_) => {
                debug!(screen_x, screen_y, ?outcome, "click ignored");
            }
            ClickOutcome::NoPlayer => warn!("click without a player entity"),
        }
        outcome
    }

    /// Walk the player to a tile.
    pub fn move_player_to(&mut self, tile: TileCoord) -> Result<MoveOutcome> {
        if !self.map.in_bounds(tile) {
            return Err(WorldError::OutOfBounds(tile));
        }
        let Ok((pos, mover)) = self
            .world
            .query_one_mut::<(&Position, &mut Mover)>(self.player)
        else {
            warn!("move order without a player entity");
            return Ok(MoveOutcome::NoPath { destination: tile });
        };
        let outcome = systems::movement::move_to_tile(&self.map, &self.tiles, *pos, mover, tile);
        self.record_move(Actor::Player, tile, outcome);
        Ok(outcome)
    }

    /// Put the player back at the centre of the world and stop it.
    pub fn recenter(&mut self) {
        let start = world_setup::player_start(&self.map);
        if let Ok((pos, mover)) = self
            .world
            .query_one_mut::<(&mut Position, &mut Mover)>(self.player)
        {
            *pos = start;
            mover.target = start;
            mover.moving = false;
            mover.path = None;
            mover.path_step = 0;
        }
        systems::camera::run(&self.world, &mut self.camera, &self.map);
    }

    /// Change the viewport (canvas) size and re-follow the player.
    pub fn resize_viewport(&mut self, width: f64, height: f64) -> Result<()> {
        if !systems::camera::valid_viewport(width, height) {
            return Err(WorldError::InvalidViewport { width, height });
        }
        self.camera.resize(width, height);
        systems::camera::run(&self.world, &mut self.camera, &self.map);
        Ok(())
    }

    // --- Units ---

    pub fn create_unit(
        &mut self,
        unit_type: UnitType,
        tile: TileCoord,
        name: Option<String>,
    ) -> Result<UnitId> {
        let id = systems::units::create_unit(
            &mut self.world,
            &mut self.units,
            &self.map,
            &self.tiles,
            unit_type,
            tile,
            name,
            self.time.tick,
        )?;
        self.events.push(GameEvent::UnitCreated {
            unit_id: id,
            unit_type,
            tile,
        });
        Ok(id)
    }

    pub fn move_unit(&mut self, id: UnitId, tile: TileCoord) -> Result<MoveOutcome> {
        let outcome = systems::units::move_unit(
            &mut self.world,
            &self.units,
            &self.map,
            &self.tiles,
            id,
            tile,
            self.time.tick,
        )?;
        self.record_move(Actor::Unit { unit_id: id }, tile, outcome);
        Ok(outcome)
    }

    pub fn remove_unit(&mut self, id: UnitId) -> Result<()> {
        systems::units::remove_unit(&mut self.world, &mut self.units, id)?;
        self.events.push(GameEvent::UnitRemoved { unit_id: id });
        Ok(())
    }

    pub fn damage_unit(&mut self, id: UnitId, amount: i32) -> Result<DamageOutcome> {
        systems::combat::damage_unit(&mut self.world, &self.units, id, amount, &mut self.events)
    }

    pub fn heal_unit(&mut self, id: UnitId, amount: i32) -> Result<i32> {
        systems::combat::heal_unit(&mut self.world, &self.units, id, amount, &mut self.events)
    }

    pub fn spawn_random_unit(&mut self) -> Result<UnitId> {
        let id = systems::units::spawn_random_unit(
            &mut self.world,
            &mut self.units,
            &self.map,
            &self.tiles,
            &mut self.rng,
            self.time.tick,
        )?;
        let entity = self.units.entity(id).ok_or(WorldError::UnitNotFound(id))?;
        let unit_type = self
            .world
            .get::<&UnitInfo>(entity)
            .map(|info| info.unit_type)
            .map_err(|_| WorldError::UnitNotFound(id))?;
        let tile = self.units_tile(entity);
        self.events.push(GameEvent::UnitCreated {
            unit_id: id,
            unit_type,
            tile,
        });
        Ok(id)
    }

    pub fn remove_newest_unit(&mut self) -> Result<UnitId> {
        let id = systems::units::remove_newest_unit(&mut self.world, &mut self.units)?;
        self.events.push(GameEvent::UnitRemoved { unit_id: id });
        Ok(id)
    }

    pub fn alive_unit_count(&self) -> usize {
        systems::units::alive_count(&self.world)
    }

    // --- Simulation control ---

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Active {
            self.phase = GamePhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Active;
        }
    }

    fn units_tile(&self, entity: Entity) -> TileCoord {
        self.world
            .get::<&TilePosition>(entity)
            .map(|t| t.0)
            .unwrap_or_default()
    }

    /// Turn a move order into a path event.
    fn record_move(&mut self, actor: Actor, tile: TileCoord, outcome: MoveOutcome) {
        match outcome {
            MoveOutcome::AlreadyThere => {}
            MoveOutcome::Planned { steps, destination } => {
                debug!(?actor, %destination, steps, "path planned");
                self.events.push(GameEvent::PathPlanned {
                    actor,
                    steps,
                    destination,
                });
            }
            MoveOutcome::NoPath { destination } => {
                debug!(?actor, requested = %tile, %destination, "no path");
                self.events.push(GameEvent::PathNotFound { actor, destination });
            }
        }
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command. Failures become `CommandRejected`.
    fn handle_command(&mut self, command: PlayerCommand) {
        let result = match command {
            PlayerCommand::ClickCanvas { x, y } => {
                self.click(x, y);
                Ok(())
            }
            PlayerCommand::MoveToTile { x, y } => {
                self.move_player_to(TileCoord::new(x, y)).map(|_| ())
            }
            PlayerCommand::Recenter => {
                self.recenter();
                Ok(())
            }
            PlayerCommand::ResizeViewport { width, height } => self.resize_viewport(width, height),
            PlayerCommand::CreateUnit {
                unit_type,
                x,
                y,
                name,
            } => self
                .create_unit(unit_type, TileCoord::new(x, y), name)
                .map(|_| ()),
            PlayerCommand::MoveUnit { unit_id, x, y } => {
                self.move_unit(unit_id, TileCoord::new(x, y)).map(|_| ())
            }
            PlayerCommand::RemoveUnit { unit_id } => self.remove_unit(unit_id),
            PlayerCommand::DamageUnit { unit_id, amount } => {
                self.damage_unit(unit_id, amount).map(|_| ())
            }
            PlayerCommand::HealUnit { unit_id, amount } => {
                self.heal_unit(unit_id, amount).map(|_| ())
            }
            PlayerCommand::SpawnRandomUnit => self.spawn_random_unit().map(|_| ()),
            PlayerCommand::RemoveNewestUnit => self.remove_newest_unit().map(|_| ()),
            PlayerCommand::Pause => {
                self.pause();
                Ok(())
            }
            PlayerCommand::Resume => {
                self.resume();
                Ok(())
            }
        };

        if let Err(e) = result {
            warn!(error = %e, "command rejected");
            self.events.push(GameEvent::CommandRejected {
                reason: e.to_string(),
            });
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        // 1. Path following
        systems::movement::run(&mut self.world, &self.map, &self.tiles, &mut self.events);
        // 2. Keep everything on the map
        systems::movement::clamp_all(&mut self.world, &self.map);
        // 3. Re-index units that changed tile
        systems::units::sync_tiles(&mut self.world, &mut self.units, &self.map);
        // 4. Camera follows the player
        systems::camera::run(&self.world, &mut self.camera, &self.map);
    }

    fn build_snapshot(&self, events: Vec<GameEvent>) -> GameStateSnapshot {
        systems::snapshot::build_snapshot(
            &self.world,
            &self.map,
            &self.camera,
            &self.time,
            self.phase,
            events,
        )
    }
}

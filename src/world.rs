//! Body registry and fixed-tick driver.

use std::collections::HashMap;

use glam::Vec2;
use hecs::Entity;
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::components::{
    Aabb, BodyId, BodyKind, Color, DashState, Grounded, Moveable, Player, PlayerFsm, Terrain,
    Velocity,
};
use crate::config::PhysicsConfig;
use crate::engine::input::InputState;
use crate::events::{BodyDescription, WorldEvent};
use crate::scene::prefabs::{BodySpec, PLAYER_COLOR};
use crate::systems::{self, StepCtx};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("world has no player")]
    NoPlayer,
}

/// Point-in-time copy of one body's state.
#[derive(Clone, Debug, PartialEq)]
pub struct BodySnapshot {
    pub id: BodyId,
    pub kind: BodyKind,
    pub aabb: Aabb,
    pub velocity: Vec2,
    pub grounded: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerSnapshot {
    pub body: BodySnapshot,
    pub can_dash: bool,
}

/// Registry of every body plus the tick driver.
///
/// Solid terrain lives in `statics`, boxes in `moveables`, both in
/// registration order. The player is tracked on its own and is in neither
/// list. Decorative terrain is spawned (so it can be described and removed)
/// but takes no part in collision.
pub struct World {
    ecs: hecs::World,
    config: PhysicsConfig,
    gravity: f32,
    statics: Vec<Entity>,
    moveables: Vec<Entity>,
    player: Option<Entity>,
    index: HashMap<BodyId, Entity>,
    next_id: u64,
    events: Vec<WorldEvent>,
    rng: StdRng,
    ticks: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl World {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            ecs: hecs::World::new(),
            gravity: config.gravity,
            rng: StdRng::seed_from_u64(config.seed),
            config,
            statics: Vec::new(),
            moveables: Vec::new(),
            player: None,
            index: HashMap::new(),
            next_id: 0,
            events: Vec::new(),
            ticks: 0,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    /// Number of scheduled ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn allocate_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    fn id_of(&self, entity: Entity) -> Option<BodyId> {
        self.ecs.get::<&BodyId>(entity).ok().map(|id| *id)
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Register a body and return its id.
    pub fn add(&mut self, spec: BodySpec) -> BodyId {
        let id = self.allocate_id();
        let kind = spec.kind();
        let aabb = *spec.aabb();
        let color = spec.color().to_string();

        let entity = match spec {
            BodySpec::Terrain {
                solid, breakable, ..
            } => {
                let entity = self.ecs.spawn((id, aabb, Terrain { solid, breakable }, Color(color.clone())));
                if solid {
                    self.statics.push(entity);
                }
                entity
            }
            BodySpec::Moveable { .. } => {
                let entity = self.ecs.spawn((id, aabb, Velocity::default(), Moveable, Color(color.clone())));
                self.moveables.push(entity);
                entity
            }
        };
        self.index.insert(id, entity);
        self.events.push(WorldEvent::Spawned(BodyDescription {
            id,
            aabb,
            color,
            kind,
        }));
        id
    }

    /// Place the player at `pos`, replacing any existing player.
    pub fn spawn_player(&mut self, pos: Vec2) -> BodyId {
        if let Some(id) = self.player.and_then(|e| self.id_of(e)) {
            self.remove(id);
        }

        let id = self.allocate_id();
        let aabb = Aabb {
            pos,
            size: Vec2::splat(self.config.player_size),
        };
        let entity = self.ecs.spawn((
            id,
            aabb,
            Velocity::default(),
            Player,
            PlayerFsm::new(DashState::Ready),
            Color(PLAYER_COLOR.to_string()),
        ));
        self.player = Some(entity);
        self.index.insert(id, entity);
        self.events.push(WorldEvent::Spawned(BodyDescription {
            id,
            aabb,
            color: PLAYER_COLOR.to_string(),
            kind: BodyKind::Player,
        }));
        id
    }

    /// Unregister a body. Returns `false` if it was already gone.
    pub fn remove(&mut self, id: BodyId) -> bool {
        let Some(entity) = self.index.remove(&id) else {
            return false;
        };
        self.statics.retain(|&e| e != entity);
        self.moveables.retain(|&e| e != entity);
        if self.player == Some(entity) {
            self.player = None;
        }
        let _ = self.ecs.despawn(entity);
        self.events.push(WorldEvent::Removed { id });
        true
    }

    /// Shatter a terrain body: remove it and emit its debris burst.
    ///
    /// Idempotent: a body that is already gone (or is not terrain) is left
    /// alone and `false` is returned.
    pub fn break_body(&mut self, id: BodyId, impact: Vec2) -> bool {
        let Some(&entity) = self.index.get(&id) else {
            return false;
        };
        if self.ecs.get::<&Terrain>(entity).is_err() {
            return false;
        }
        let Ok(aabb) = self.ecs.get::<&Aabb>(entity).map(|a| *a) else {
            return false;
        };
        let color = self
            .ecs
            .get::<&Color>(entity)
            .map(|c| c.0.clone())
            .unwrap_or_default();

        self.remove(id);
        let effect = systems::shatter(&mut self.rng, &self.config, id, &aabb, &color, impact);
        debug!("{id} shattered at {:?}, impact {:?}", aabb.pos, impact);
        self.events.push(WorldEvent::Broken(effect));
        true
    }

    // -----------------------------------------------------------------------
    // Gravity
    // -----------------------------------------------------------------------

    /// Change gravity and immediately re-step every box.
    ///
    /// The player always loses `Grounded`. When the sign flips, every box
    /// loses it too, since its resting surface is now on the wrong side.
    pub fn set_gravity(&mut self, value: f32) {
        let flipped = (value > 0.0) != (self.gravity > 0.0);
        self.gravity = value;

        if let Some(player) = self.player {
            let _ = self.ecs.remove_one::<Grounded>(player);
        }
        if flipped {
            debug!("gravity flipped to {value}");
            for &entity in &self.moveables {
                let _ = self.ecs.remove_one::<Grounded>(entity);
            }
        }
        self.step_moveables();
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advance one fixed tick: the player first, then boxes in registration order.
    pub fn tick(&mut self, input: &InputState) {
        self.ticks += 1;
        if let Some(player) = self.player {
            self.step_player(player, input);
        }
        self.step_moveables();
    }

    fn step_player(&mut self, entity: Entity, input: &InputState) {
        let report = {
            let ctx = StepCtx {
                statics: &self.statics,
                moveables: &self.moveables,
                gravity: self.gravity,
                config: &self.config,
            };
            systems::apply_intents(&mut self.ecs, &ctx, entity, input);
            systems::player_step(&mut self.ecs, &ctx, entity)
        };

        if let Some((wall, impact)) = report.broke {
            if let Some(id) = self.id_of(wall) {
                self.break_body(id, impact);
            }
        }
        self.emit_step(entity, report.landed);
    }

    /// Steps every box in registration order.
    ///
    /// Iterates a snapshot of the list and skips bodies despawned since the
    /// snapshot was taken, so removal during the pass is safe.
    fn step_moveables(&mut self) {
        let order = self.moveables.clone();
        for entity in order {
            if !self.ecs.contains(entity) {
                continue;
            }
            let landed = {
                let ctx = StepCtx {
                    statics: &self.statics,
                    moveables: &self.moveables,
                    gravity: self.gravity,
                    config: &self.config,
                };
                systems::moveable_step(&mut self.ecs, &ctx, entity)
            };
            self.emit_step(entity, landed);
        }
    }

    fn emit_step(&mut self, entity: Entity, landed: bool) {
        let Some(id) = self.id_of(entity) else {
            return;
        };
        if let Ok(aabb) = self.ecs.get::<&Aabb>(entity) {
            self.events.push(WorldEvent::Moved {
                id,
                position: aabb.pos,
            });
        }
        if landed {
            debug!("{id} landed");
            self.events.push(WorldEvent::Landed { id });
        }
    }

    /// Take every event produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Whether the body is grounded right now, rechecked against live contacts.
    pub fn is_grounded(&self, id: BodyId) -> bool {
        let Some(&entity) = self.index.get(&id) else {
            return false;
        };
        let ctx = StepCtx {
            statics: &self.statics,
            moveables: &self.moveables,
            gravity: self.gravity,
            config: &self.config,
        };
        systems::is_grounded(&self.ecs, &ctx, entity)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn player_id(&self) -> Option<BodyId> {
        self.player.and_then(|e| self.id_of(e))
    }

    /// Solid terrain ids, in registration order.
    pub fn statics(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.statics.iter().filter_map(|&e| self.id_of(e))
    }

    /// Box ids, in registration order.
    pub fn moveables(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.moveables.iter().filter_map(|&e| self.id_of(e))
    }

    pub fn body(&self, id: BodyId) -> Option<BodySnapshot> {
        let &entity = self.index.get(&id)?;
        let aabb = *self.ecs.get::<&Aabb>(entity).ok()?;
        let velocity = self.ecs.get::<&Velocity>(entity).map(|v| v.0).unwrap_or(Vec2::ZERO);
        let kind = if self.ecs.get::<&Player>(entity).is_ok() {
            BodyKind::Player
        } else if self.ecs.get::<&Moveable>(entity).is_ok() {
            BodyKind::Moveable
        } else {
            match self.ecs.get::<&Terrain>(entity).map(|t| *t) {
                Ok(Terrain { solid: false, .. }) => BodyKind::Decor,
                Ok(Terrain { breakable: true, .. }) => BodyKind::Breakable,
                _ => BodyKind::Solid,
            }
        };
        Some(BodySnapshot {
            id,
            kind,
            aabb,
            velocity,
            grounded: self.ecs.get::<&Grounded>(entity).is_ok(),
        })
    }

    pub fn player(&self) -> Result<PlayerSnapshot, WorldError> {
        let id = self.player_id().ok_or(WorldError::NoPlayer)?;
        let body = self.body(id).ok_or(WorldError::NoPlayer)?;
        let can_dash = self
            .player
            .and_then(|e| self.ecs.get::<&PlayerFsm>(e).ok().map(|fsm| fsm.state == DashState::Ready))
            .unwrap_or(false);
        Ok(PlayerSnapshot { body, can_dash })
    }

    /// Overwrite a body's velocity. Returns `false` for bodies without one.
    pub fn set_velocity(&mut self, id: BodyId, velocity: Vec2) -> bool {
        let Some(&entity) = self.index.get(&id) else {
            return false;
        };
        match self.ecs.get::<&mut Velocity>(entity) {
            Ok(mut vel) => {
                vel.0 = velocity;
                true
            }
            Err(_) => false,
        }
    }
}

mod breakage;
mod grounding;
mod moveable;
mod player;
mod push;

pub use breakage::shatter;
pub use grounding::{is_grounded, resolve_vertical, VerticalContact};
pub use moveable::moveable_step;
pub use player::{apply_intents, player_step, PlayerReport};
pub use push::push_chain;

use glam::Vec2;
use hecs::{Entity, World};

use crate::components::{Aabb, Grounded, Velocity};
use crate::config::PhysicsConfig;

/// Context passed to every step system.
///
/// `statics` and `moveables` are in registration order; scan order is part of
/// the collision contract (first qualifying contact wins).
#[derive(Clone, Copy)]
pub struct StepCtx<'a> {
    pub statics: &'a [Entity],
    pub moveables: &'a [Entity],
    pub gravity: f32,
    pub config: &'a PhysicsConfig,
}

pub(crate) fn aabb_of(world: &World, entity: Entity) -> Option<Aabb> {
    world.get::<&Aabb>(entity).ok().map(|aabb| *aabb)
}

pub(crate) fn set_aabb(world: &mut World, entity: Entity, value: Aabb) {
    if let Ok(mut aabb) = world.get::<&mut Aabb>(entity) {
        *aabb = value;
    }
}

pub(crate) fn velocity_of(world: &World, entity: Entity) -> Vec2 {
    world
        .get::<&Velocity>(entity)
        .map(|vel| vel.0)
        .unwrap_or(Vec2::ZERO)
}

pub(crate) fn set_velocity(world: &mut World, entity: Entity, value: Vec2) {
    if let Ok(mut vel) = world.get::<&mut Velocity>(entity) {
        vel.0 = value;
    }
}

pub(crate) fn has_grounded(world: &World, entity: Entity) -> bool {
    world.get::<&Grounded>(entity).is_ok()
}

/// `f32::signum` maps 0.0 to 1.0; motion code needs 0.0 to stay 0.0.
pub(crate) fn sign_or_zero(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

//! Outputs of the simulation, drained by the render and effect layers.

use glam::Vec2;

use crate::components::{Aabb, BodyId, BodyKind};

/// One-off description of a body, emitted when it is registered.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyDescription {
    pub id: BodyId,
    pub aabb: Aabb,
    pub color: String,
    pub kind: BodyKind,
}

/// Request to spawn one debris particle. Particle motion is owned by the effect layer.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleRequest {
    pub spawn: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub lifetime_ms: u64,
    pub gravity_affected: bool,
}

/// A breakable block shattered.
#[derive(Clone, Debug, PartialEq)]
pub struct BreakEffect {
    pub id: BodyId,
    /// Top-left corner of the destroyed block.
    pub origin: Vec2,
    pub size: Vec2,
    pub color: String,
    pub impact: Vec2,
    pub particles: Vec<ParticleRequest>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum WorldEvent {
    Spawned(BodyDescription),
    /// Position after the body's step this tick.
    Moved { id: BodyId, position: Vec2 },
    /// Body entered the grounded state.
    Landed { id: BodyId },
    Broken(BreakEffect),
    Removed { id: BodyId },
}

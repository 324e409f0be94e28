use glam::Vec2;
use rand::Rng;

use crate::components::{Aabb, BodyId};
use crate::config::PhysicsConfig;
use crate::events::{BreakEffect, ParticleRequest};

/// Build the debris burst for a shattered block.
///
/// Each particle spawns at a uniform point inside `aabb` and starts at
/// `impact` plus an independent uniform jitter in `[-particle_jitter, particle_jitter]` per axis.
pub fn shatter<R: Rng>(
    rng: &mut R,
    config: &PhysicsConfig,
    id: BodyId,
    aabb: &Aabb,
    color: &str,
    impact: Vec2,
) -> BreakEffect {
    let jitter = config.particle_jitter;
    let extent = aabb.size.max(Vec2::ZERO);

    let particles = (0..config.particle_count)
        .map(|_| {
            let offset = Vec2::new(rng.gen_range(0.0..=extent.x), rng.gen_range(0.0..=extent.y));
            let kick = Vec2::new(rng.gen_range(-jitter..=jitter), rng.gen_range(-jitter..=jitter));
            ParticleRequest {
                spawn: aabb.pos + offset,
                velocity: impact + kick,
                size: config.particle_size,
                lifetime_ms: config.particle_lifetime_ms,
                gravity_affected: true,
            }
        })
        .collect();

    BreakEffect {
        id,
        origin: aabb.pos,
        size: aabb.size,
        color: color.to_string(),
        impact,
        particles,
    }
}

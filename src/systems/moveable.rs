use hecs::{Entity, World};

use super::{has_grounded, is_grounded, push_chain, resolve_vertical, velocity_of, StepCtx, VerticalContact};
use crate::components::{Aabb, Grounded, Velocity};

/// Advance one box by a tick. Returns `true` if the box landed this tick.
///
/// 1. Drop `Grounded` if the support is gone.
/// 2. Airborne: integrate y, then add gravity, then resolve vertical contact.
/// 3. Slide horizontally by the box's own `vx` through [`push_chain`].
pub fn moveable_step(world: &mut World, ctx: &StepCtx, entity: Entity) -> bool {
    if has_grounded(world, entity) && !is_grounded(world, ctx, entity) {
        let _ = world.remove_one::<Grounded>(entity);
    }

    let mut landed = false;
    if !has_grounded(world, entity) {
        if let Ok((aabb, vel)) = world.query_one_mut::<(&mut Aabb, &mut Velocity)>(entity) {
            aabb.pos.y += vel.0.y;
            vel.0.y += ctx.gravity;
        }
        landed = resolve_vertical(world, ctx, entity) == VerticalContact::Grounded;
    }

    let vx = velocity_of(world, entity).x;
    push_chain(world, ctx, entity, vx);

    landed
}

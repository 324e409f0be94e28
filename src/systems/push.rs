use hecs::{Entity, World};
use log::trace;

use super::{aabb_of, set_aabb, sign_or_zero, StepCtx};
use crate::components::{Aabb, Velocity};

fn set_velocity_x(world: &mut World, entity: Entity, vx: f32) {
    if let Ok(mut vel) = world.get::<&mut Velocity>(entity) {
        vel.0.x = vx;
    }
}

/// First body in `candidates` that `body` runs into moving along `dir`, with the penetration depth.
fn first_hit(
    world: &World,
    candidates: impl IntoIterator<Item = Entity>,
    body: &Aabb,
    dir: f32,
) -> Option<(Entity, f32)> {
    candidates.into_iter().find_map(|e| {
        let other = aabb_of(world, e)?;
        body.horizontal_penetration(&other, dir).map(|pen| (e, pen))
    })
}

/// Displace moveable `start` horizontally by `request`, shoving any moveables
/// in the way, and return how far `start` was clamped back.
///
/// Each link sets its own `vx` to its request times `damping` and hands that
/// damped value on as the next link's request. The chain ends at free space,
/// at a static body (the link is clamped to touch it), at a body already in the
/// chain, or at `max_push_chain` links; the last two are treated like statics.
/// Links then settle back to front so no link overlaps the one it pushed.
pub fn push_chain(world: &mut World, ctx: &StepCtx, start: Entity, request: f32) -> f32 {
    let damping = ctx.config.damping;
    let dir = sign_or_zero(request);
    if dir == 0.0 {
        set_velocity_x(world, start, 0.0);
        return 0.0;
    }

    let mut chain: Vec<Entity> = Vec::new();
    let mut clamps: Vec<f32> = Vec::new();
    let mut current = start;
    let mut step = request;

    loop {
        let Some(mut body) = aabb_of(world, current) else {
            break;
        };
        body.pos.x += step;
        set_velocity_x(world, current, step * damping);
        chain.push(current);

        if let Some((_, pen)) = first_hit(world, ctx.statics.iter().copied(), &body, dir) {
            body.pos.x -= dir * pen;
            set_aabb(world, current, body);
            clamps.push(pen);
            break;
        }
        set_aabb(world, current, body);

        let others = ctx.moveables.iter().copied().filter(|&e| e != current);
        let Some((next, pen)) = first_hit(world, others, &body, dir) else {
            clamps.push(0.0);
            break;
        };
        if chain.contains(&next) || chain.len() >= ctx.config.max_push_chain {
            trace!("push chain stopped after {} links", chain.len());
            body.pos.x -= dir * pen;
            set_aabb(world, current, body);
            clamps.push(pen);
            break;
        }
        clamps.push(0.0);

        current = next;
        step *= damping;
    }

    for i in (0..chain.len().saturating_sub(1)).rev() {
        let (Some(mut body), Some(ahead)) = (aabb_of(world, chain[i]), aabb_of(world, chain[i + 1])) else {
            continue;
        };
        if let Some(pen) = body.horizontal_penetration(&ahead, dir) {
            body.pos.x -= dir * pen;
            set_aabb(world, chain[i], body);
            clamps[i] += pen;
        }
    }

    clamps.first().copied().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::systems::testing::{crate_box, wall};
    use crate::systems::velocity_of;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn free_push_moves_full_request_and_damps() {
        let config = PhysicsConfig::default();
        let mut world = World::new();
        let a = crate_box(&mut world, 620.0, 960.0, 40.0, 40.0);
        let moveables = [a];
        let ctx = StepCtx {
            statics: &[],
            moveables: &moveables,
            gravity: 0.2,
            config: &config,
        };

        let clamp = push_chain(&mut world, &ctx, a, 4.0);
        assert_eq!(clamp, 0.0);
        assert!(close(aabb_of(&world, a).unwrap().left(), 624.0));
        assert!(close(velocity_of(&world, a).x, 3.6));
    }

    #[test]
    fn wall_clamps_single_box() {
        let config = PhysicsConfig::default();
        let mut world = World::new();
        let w = wall(&mut world, 100.0, 0.0, 20.0, 100.0);
        let a = crate_box(&mut world, 58.0, 10.0, 40.0, 40.0);
        let statics = [w];
        let moveables = [a];
        let ctx = StepCtx {
            statics: &statics,
            moveables: &moveables,
            gravity: 0.2,
            config: &config,
        };

        let clamp = push_chain(&mut world, &ctx, a, 5.0);
        assert!(close(clamp, 3.0));
        assert!(close(aabb_of(&world, a).unwrap().right(), 100.0));
    }

    #[test]
    fn chained_push_is_bounded_by_wall() {
        let config = PhysicsConfig::default();
        let mut world = World::new();
        let w = wall(&mut world, 150.0, 0.0, 20.0, 100.0);
        let a = crate_box(&mut world, 60.0, 10.0, 40.0, 40.0);
        let b = crate_box(&mut world, 100.0, 10.0, 40.0, 40.0);
        let statics = [w];
        let moveables = [a, b];
        let ctx = StepCtx {
            statics: &statics,
            moveables: &moveables,
            gravity: 0.2,
            config: &config,
        };

        let before_a = aabb_of(&world, a).unwrap().left();
        let before_b = aabb_of(&world, b).unwrap().left();
        let clamp = push_chain(&mut world, &ctx, a, 20.0);

        let moved_a = aabb_of(&world, a).unwrap().left() - before_a;
        let moved_b = aabb_of(&world, b).unwrap().left() - before_b;
        assert!(close(moved_b, 10.0));
        assert!(close(moved_a, moved_b));
        assert!(close(clamp, 20.0 - moved_a));
        assert!(close(aabb_of(&world, b).unwrap().right(), 150.0));
        assert!(close(aabb_of(&world, a).unwrap().right(), aabb_of(&world, b).unwrap().left()));
    }

    #[test]
    fn leftward_chain_mirrors_rightward() {
        let config = PhysicsConfig::default();
        let mut world = World::new();
        let w = wall(&mut world, 0.0, 0.0, 20.0, 100.0);
        let a = crate_box(&mut world, 70.0, 10.0, 40.0, 40.0);
        let b = crate_box(&mut world, 30.0, 10.0, 40.0, 40.0);
        let statics = [w];
        let moveables = [a, b];
        let ctx = StepCtx {
            statics: &statics,
            moveables: &moveables,
            gravity: 0.2,
            config: &config,
        };

        let clamp = push_chain(&mut world, &ctx, a, -15.0);
        assert!(close(aabb_of(&world, b).unwrap().left(), 20.0));
        assert!(close(aabb_of(&world, a).unwrap().left(), 60.0));
        assert!(close(clamp, 5.0));
    }

    #[test]
    fn stacked_duplicates_do_not_recurse_forever() {
        let config = PhysicsConfig::default();
        let mut world = World::new();
        let a = crate_box(&mut world, 0.0, 0.0, 40.0, 40.0);
        let b = crate_box(&mut world, 0.0, 0.0, 40.0, 40.0);
        let moveables = [a, b];
        let ctx = StepCtx {
            statics: &[],
            moveables: &moveables,
            gravity: 0.2,
            config: &config,
        };

        push_chain(&mut world, &ctx, a, 5.0);
        let left_a = aabb_of(&world, a).unwrap().left();
        assert!(left_a.is_finite());
    }

    #[test]
    fn chain_cap_acts_as_obstruction() {
        let config = PhysicsConfig {
            max_push_chain: 1,
            ..PhysicsConfig::default()
        };
        let mut world = World::new();
        let a = crate_box(&mut world, 0.0, 0.0, 40.0, 40.0);
        let b = crate_box(&mut world, 40.0, 0.0, 40.0, 40.0);
        let moveables = [a, b];
        let ctx = StepCtx {
            statics: &[],
            moveables: &moveables,
            gravity: 0.2,
            config: &config,
        };

        let clamp = push_chain(&mut world, &ctx, a, 5.0);
        assert!(close(clamp, 5.0));
        assert!(close(aabb_of(&world, a).unwrap().left(), 0.0));
        assert!(close(aabb_of(&world, b).unwrap().left(), 40.0));
    }

    #[test]
    fn zero_request_only_clears_velocity() {
        let config = PhysicsConfig::default();
        let mut world = World::new();
        let a = crate_box(&mut world, 0.0, 0.0, 40.0, 40.0);
        let moveables = [a];
        let ctx = StepCtx {
            statics: &[],
            moveables: &moveables,
            gravity: 0.2,
            config: &config,
        };
        assert_eq!(push_chain(&mut world, &ctx, a, 0.0), 0.0);
        assert_eq!(aabb_of(&world, a).unwrap().left(), 0.0);
    }
}

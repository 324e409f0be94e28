use glam::Vec2;
use hecs::{Entity, World};
use log::debug;

use super::{
    aabb_of, has_grounded, is_grounded, push_chain, resolve_vertical, set_aabb, set_velocity,
    sign_or_zero, velocity_of, StepCtx, VerticalContact,
};
use crate::components::{DashState, Grounded, PlayerFsm, Terrain, Velocity};
use crate::config::PhysicsConfig;
use crate::engine::input::{Action, InputState};

/// What the world must act on after a player step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerReport {
    /// Breakable static hit fast enough to shatter, with the impact velocity.
    pub broke: Option<(Entity, Vec2)>,
    pub landed: bool,
}

// ---------------------------------------------------------------------------
// Dash transitions
// ---------------------------------------------------------------------------

/// `Spent -> Ready` once grounded and slow enough.
fn recharge_dash(world: &mut World, config: &PhysicsConfig, entity: Entity) {
    let grounded = has_grounded(world, entity);
    if let Ok((vel, fsm)) = world.query_one_mut::<(&Velocity, &mut PlayerFsm)>(entity) {
        if grounded && fsm.state == DashState::Spent && vel.0.x.abs() <= config.dash_recharge_speed {
            fsm.go(DashState::Ready);
        }
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Apply this tick's intents to the player. Runs before [`player_step`].
///
/// Order: held movement, then dash, then jump. Held directions only raise
/// speed to `walk_speed`; they never slow a faster player down.
pub fn apply_intents(world: &mut World, ctx: &StepCtx, entity: Entity, input: &InputState) {
    let config = ctx.config;
    let grounded = has_grounded(world, entity);
    let mut jumped = false;

    if let Ok((vel, fsm)) = world.query_one_mut::<(&mut Velocity, &mut PlayerFsm)>(entity) {
        fsm.tick();

        if input.is_held(Action::Left) {
            vel.0.x = vel.0.x.min(-config.walk_speed);
        }
        if input.is_held(Action::Right) {
            vel.0.x = vel.0.x.max(config.walk_speed);
        }

        // A dash with no horizontal speed still spends the charge.
        if input.just_pressed(Action::Dash) && fsm.state == DashState::Ready {
            vel.0.x = config.dash_speed * sign_or_zero(vel.0.x);
            fsm.go(DashState::Spent);
        }

        if input.just_pressed(Action::Jump) && grounded {
            vel.0.y = if ctx.gravity > 0.0 {
                -config.jump_speed
            } else {
                config.jump_speed
            };
            jumped = true;
        }
    }

    if jumped {
        let _ = world.remove_one::<Grounded>(entity);
    }
}

/// Advance the player by one tick.
///
/// Horizontal first (damped, dead-zoned, clamped or shattering against
/// statics, shoving moveables), then x is rounded to a whole pixel, then the
/// vertical pass. Gravity is added last while airborne.
pub fn player_step(world: &mut World, ctx: &StepCtx, entity: Entity) -> PlayerReport {
    let config = ctx.config;
    let mut report = PlayerReport::default();

    if has_grounded(world, entity) && !is_grounded(world, ctx, entity) {
        let _ = world.remove_one::<Grounded>(entity);
    }
    recharge_dash(world, config, entity);

    let Some(mut body) = aabb_of(world, entity) else {
        return report;
    };
    let mut vel = velocity_of(world, entity);

    let dx = vel.x;
    body.pos.x += dx;
    vel.x *= config.damping;
    if vel.x.abs() <= config.drift_cutoff {
        vel.x = 0.0;
    }
    set_velocity(world, entity, vel);

    // A shattered block is gone for the rest of this step.
    let mut remaining: Vec<Entity> = Vec::new();
    let mut ctx = *ctx;

    let dir = sign_or_zero(dx);
    if dir != 0.0 {
        let wall = ctx.statics.iter().copied().find_map(|e| {
            let other = aabb_of(world, e)?;
            body.horizontal_penetration(&other, dir).map(|pen| (e, pen))
        });

        let mut blocked = false;
        if let Some((wall, pen)) = wall {
            let breakable = world.get::<&Terrain>(wall).map(|t| t.breakable).unwrap_or(false);
            if breakable && vel.x * dir > config.break_speed {
                report.broke = Some((wall, Vec2::new(vel.x, 0.0)));
                remaining = ctx.statics.iter().copied().filter(|&e| e != wall).collect();
            } else {
                body.pos.x -= dir * pen;
                blocked = true;
            }
        }
        if report.broke.is_some() {
            ctx.statics = &remaining;
        }

        if !blocked {
            let shoved = ctx.moveables.iter().copied().find_map(|e| {
                let other = aabb_of(world, e)?;
                body.horizontal_penetration(&other, dir).map(|pen| (e, pen))
            });
            if let Some((target, pen)) = shoved {
                let clamp = push_chain(world, &ctx, target, dir * pen);
                body.pos.x -= dir * clamp;
            }
        }
    }

    body.pos.x = body.pos.x.round();
    body.pos.y += vel.y;
    set_aabb(world, entity, body);

    if resolve_vertical(world, &ctx, entity) == VerticalContact::Grounded {
        report.landed = true;
        recharge_dash(world, config, entity);
    }

    if !has_grounded(world, entity) {
        if let Ok(mut vel) = world.get::<&mut Velocity>(entity) {
            vel.0.y += ctx.gravity;
        }
    }

    if let Ok(fsm) = world.get::<&PlayerFsm>(entity) {
        if fsm.just_entered() && fsm.state != fsm.previous {
            debug!("[player] dash -> {}", fsm.state.label());
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::engine::input::InputEvent;
    use crate::systems::testing::{brittle, crate_box, player, wall};

    fn ground(world: &mut World, entity: Entity) {
        world.insert_one(entity, Grounded).unwrap();
    }

    #[test]
    fn velocity_decays_and_snaps_to_zero() {
        let config = PhysicsConfig::default();
        let mut world = World::new();
        let floor = wall(&mut world, 0.0, 1000.0, 1920.0, 80.0);
        let p = player(&mut world, 500.0, 960.0);
        ground(&mut world, p);
        set_velocity(&mut world, p, Vec2::new(0.11, 0.0));
        let statics = [floor];
        let ctx = StepCtx {
            statics: &statics,
            moveables: &[],
            gravity: 0.2,
            config: &config,
        };

        player_step(&mut world, &ctx, p);
        assert_eq!(velocity_of(&world, p).x, 0.0);
        assert_eq!(aabb_of(&world, p).unwrap().left(), 500.0);
    }

    #[test]
    fn slow_player_stops_at_breakable() {
        let config = PhysicsConfig::default();
        let mut world = World::new();
        let floor = wall(&mut world, 0.0, 1000.0, 1920.0, 80.0);
        let block = brittle(&mut world, 600.0, 920.0, 80.0, 80.0);
        let p = player(&mut world, 558.0, 960.0);
        ground(&mut world, p);
        set_velocity(&mut world, p, Vec2::new(4.0, 0.0));
        let statics = [floor, block];
        let ctx = StepCtx {
            statics: &statics,
            moveables: &[],
            gravity: 0.2,
            config: &config,
        };

        let report = player_step(&mut world, &ctx, p);
        assert!(report.broke.is_none());
        assert_eq!(aabb_of(&world, p).unwrap().right(), 600.0);
    }

    #[test]
    fn fast_player_shatters_breakable() {
        let config = PhysicsConfig::default();
        let mut world = World::new();
        let floor = wall(&mut world, 0.0, 1000.0, 1920.0, 80.0);
        let block = brittle(&mut world, 600.0, 920.0, 80.0, 80.0);
        let p = player(&mut world, 558.0, 960.0);
        ground(&mut world, p);
        set_velocity(&mut world, p, Vec2::new(6.0, 0.0));
        let statics = [floor, block];
        let ctx = StepCtx {
            statics: &statics,
            moveables: &[],
            gravity: 0.2,
            config: &config,
        };

        let report = player_step(&mut world, &ctx, p);
        let (hit, impact) = report.broke.expect("block should shatter");
        assert_eq!(hit, block);
        assert!((impact.x - 5.4).abs() < 1e-4);
        assert_eq!(impact.y, 0.0);
        assert_eq!(aabb_of(&world, p).unwrap().left(), 564.0);
    }

    #[test]
    fn player_push_hands_penetration_to_box() {
        let config = PhysicsConfig::default();
        let mut world = World::new();
        let floor = wall(&mut world, 0.0, 1000.0, 1920.0, 80.0);
        let b = crate_box(&mut world, 620.0, 960.0, 40.0, 40.0);
        let p = player(&mut world, 580.0, 960.0);
        ground(&mut world, p);
        ground(&mut world, b);
        set_velocity(&mut world, p, Vec2::new(4.0, 0.0));
        let statics = [floor];
        let moveables = [b];
        let ctx = StepCtx {
            statics: &statics,
            moveables: &moveables,
            gravity: 0.2,
            config: &config,
        };

        player_step(&mut world, &ctx, p);
        assert!((aabb_of(&world, b).unwrap().left() - 624.0).abs() < 1e-4);
        assert!((velocity_of(&world, b).x - 3.6).abs() < 1e-4);
        assert_eq!(aabb_of(&world, p).unwrap().left(), 584.0);
    }

    #[test]
    fn jump_requires_ground_and_points_against_gravity() {
        let config = PhysicsConfig::default();
        let mut world = World::new();
        let p = player(&mut world, 0.0, 0.0);
        let ctx = StepCtx {
            statics: &[],
            moveables: &[],
            gravity: 0.2,
            config: &config,
        };
        let mut input = InputState::new();
        input.push(InputEvent::Pressed(Action::Jump));

        apply_intents(&mut world, &ctx, p, &input);
        assert_eq!(velocity_of(&world, p).y, 0.0);

        ground(&mut world, p);
        apply_intents(&mut world, &ctx, p, &input);
        assert_eq!(velocity_of(&world, p).y, -10.0);
        assert!(!has_grounded(&world, p));

        let flipped = StepCtx { gravity: -0.2, ..ctx };
        ground(&mut world, p);
        apply_intents(&mut world, &flipped, p, &input);
        assert_eq!(velocity_of(&world, p).y, 10.0);
    }

    #[test]
    fn held_direction_sets_walk_speed_floor() {
        let config = PhysicsConfig::default();
        let mut world = World::new();
        let p = player(&mut world, 0.0, 0.0);
        let ctx = StepCtx {
            statics: &[],
            moveables: &[],
            gravity: 0.2,
            config: &config,
        };
        let mut input = InputState::new();
        input.push(InputEvent::Pressed(Action::Right));

        apply_intents(&mut world, &ctx, p, &input);
        assert_eq!(velocity_of(&world, p).x, 3.0);

        set_velocity(&mut world, p, Vec2::new(12.0, 0.0));
        apply_intents(&mut world, &ctx, p, &input);
        assert_eq!(velocity_of(&world, p).x, 12.0);
    }

    #[test]
    fn dash_spends_charge_once() {
        let config = PhysicsConfig::default();
        let mut world = World::new();
        let p = player(&mut world, 0.0, 0.0);
        set_velocity(&mut world, p, Vec2::new(-2.0, 0.0));
        let ctx = StepCtx {
            statics: &[],
            moveables: &[],
            gravity: 0.2,
            config: &config,
        };
        let mut input = InputState::new();
        input.push(InputEvent::Pressed(Action::Dash));

        apply_intents(&mut world, &ctx, p, &input);
        assert_eq!(velocity_of(&world, p).x, -30.0);
        assert_eq!(world.get::<&PlayerFsm>(p).unwrap().state, DashState::Spent);

        set_velocity(&mut world, p, Vec2::new(-2.0, 0.0));
        apply_intents(&mut world, &ctx, p, &input);
        assert_eq!(velocity_of(&world, p).x, -2.0);
    }
}

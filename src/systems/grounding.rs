use hecs::{Entity, World};

use super::{aabb_of, has_grounded, set_aabb, velocity_of, StepCtx};
use crate::components::{Aabb, Grounded, Velocity};

/// Result of the vertical pass of a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalContact {
    /// No surface crossed.
    Free,
    /// Stopped by a surface against gravity (e.g. a ceiling).
    Blocked,
    /// Stopped by a surface in the gravity direction; `Grounded` was inserted.
    Grounded,
}

/// Whether `entity` is still resting on something in the gravity direction.
///
/// Only bodies already flagged `Grounded` can pass. Resting means exact edge
/// equality on y plus strict overlap on x; a support that is itself a
/// moveable must also be grounded. Statics are scanned before moveables.
pub fn is_grounded(world: &World, ctx: &StepCtx, entity: Entity) -> bool {
    if !has_grounded(world, entity) {
        return false;
    }
    let Some(body) = aabb_of(world, entity) else {
        return false;
    };

    let rests_on = |other: &Aabb| {
        body.overlaps_x(other)
            && if ctx.gravity > 0.0 {
                body.bottom() == other.top()
            } else {
                body.top() == other.bottom()
            }
    };

    ctx.statics
        .iter()
        .filter_map(|&e| aabb_of(world, e))
        .any(|other| rests_on(&other))
        || ctx
            .moveables
            .iter()
            .filter(|&&e| e != entity && has_grounded(world, e))
            .filter_map(|&e| aabb_of(world, e))
            .any(|other| rests_on(&other))
}

/// First surface whose edge `body` crossed this tick while moving with `vy`.
fn find_crossed(world: &World, ctx: &StepCtx, entity: Entity, body: &Aabb, vy: f32) -> Option<Aabb> {
    let crossed = |other: &Aabb| {
        if !body.overlaps_x(other) {
            return false;
        }
        if vy > 0.0 {
            body.top() < other.top() && body.bottom() > other.top()
        } else {
            body.top() < other.bottom() && body.bottom() > other.bottom()
        }
    };

    ctx.statics
        .iter()
        .copied()
        .chain(
            ctx.moveables
                .iter()
                .copied()
                .filter(|&e| e != entity && has_grounded(world, e)),
        )
        .filter_map(|e| aabb_of(world, e))
        .find(|other| crossed(other))
}

/// Push `entity` back out of the first surface it crossed on y, after its
/// vertical position has already been integrated.
///
/// Only one contact is applied per call; the position is not re-tested after
/// the adjustment. Only grounded moveables count as surfaces.
pub fn resolve_vertical(world: &mut World, ctx: &StepCtx, entity: Entity) -> VerticalContact {
    let vy = velocity_of(world, entity).y;
    if vy == 0.0 {
        return VerticalContact::Free;
    }
    let Some(mut body) = aabb_of(world, entity) else {
        return VerticalContact::Free;
    };
    let Some(surface) = find_crossed(world, ctx, entity, &body, vy) else {
        return VerticalContact::Free;
    };

    body.pos.y = if vy > 0.0 {
        surface.top() - body.size.y
    } else {
        surface.bottom()
    };
    set_aabb(world, entity, body);
    if let Ok(mut vel) = world.get::<&mut Velocity>(entity) {
        vel.0.y = 0.0;
    }

    let toward_gravity = (vy > 0.0 && ctx.gravity > 0.0) || (vy < 0.0 && ctx.gravity < 0.0);
    if toward_gravity {
        let _ = world.insert_one(entity, Grounded);
        VerticalContact::Grounded
    } else {
        VerticalContact::Blocked
    }
}

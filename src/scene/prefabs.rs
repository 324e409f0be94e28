use crate::components::{Aabb, BodyKind};

/// Colour used for the player in render descriptions.
pub const PLAYER_COLOR: &str = "white";

/// Everything needed to register a non-player body with the world.
#[derive(Clone, Debug, PartialEq)]
pub enum BodySpec {
    /// Immobile terrain. Only `solid` terrain takes part in collision.
    Terrain {
        aabb: Aabb,
        solid: bool,
        breakable: bool,
        color: String,
    },
    /// Pushable, gravity-affected box.
    Moveable { aabb: Aabb, color: String },
}

impl BodySpec {
    pub fn solid(x: f32, y: f32, w: f32, h: f32, color: &str) -> Self {
        Self::Terrain {
            aabb: Aabb::new(x, y, w, h),
            solid: true,
            breakable: false,
            color: color.to_string(),
        }
    }

    pub fn breakable(x: f32, y: f32, w: f32, h: f32, color: &str) -> Self {
        Self::Terrain {
            aabb: Aabb::new(x, y, w, h),
            solid: true,
            breakable: true,
            color: color.to_string(),
        }
    }

    /// Rendered but never collided with.
    pub fn decor(x: f32, y: f32, w: f32, h: f32, color: &str) -> Self {
        Self::Terrain {
            aabb: Aabb::new(x, y, w, h),
            solid: false,
            breakable: false,
            color: color.to_string(),
        }
    }

    pub fn moveable(x: f32, y: f32, w: f32, h: f32, color: &str) -> Self {
        Self::Moveable {
            aabb: Aabb::new(x, y, w, h),
            color: color.to_string(),
        }
    }

    pub fn aabb(&self) -> &Aabb {
        match self {
            Self::Terrain { aabb, .. } | Self::Moveable { aabb, .. } => aabb,
        }
    }

    pub fn color(&self) -> &str {
        match self {
            Self::Terrain { color, .. } | Self::Moveable { color, .. } => color,
        }
    }

    pub fn kind(&self) -> BodyKind {
        match self {
            Self::Terrain { solid: false, .. } => BodyKind::Decor,
            Self::Terrain { breakable: true, .. } => BodyKind::Breakable,
            Self::Terrain { .. } => BodyKind::Solid,
            Self::Moveable { .. } => BodyKind::Moveable,
        }
    }
}

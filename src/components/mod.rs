mod character;
mod physics;

pub use character::{DashState, Player, PlayerFsm};
pub use physics::{Aabb, Grounded, Moveable, Terrain, Velocity};

use std::fmt;

/// World-assigned body identity. Monotonic and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Display color, passed through to the render and effect sinks untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Color(pub String);

/// Classification reported to the render sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    /// Non-solid terrain; rendered but never collided with.
    Decor,
    Solid,
    Breakable,
    Moveable,
    Player,
}

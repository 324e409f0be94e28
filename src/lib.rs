pub mod components;
pub mod config;
pub mod engine;
pub mod events;
pub mod fsm;
pub mod recording;
pub mod scene;
pub mod systems;
pub mod world;

pub use components::{Aabb, BodyId, BodyKind};
pub use config::{ConfigError, PhysicsConfig};
pub use engine::input::{Action, InputEvent, InputState};
pub use events::WorldEvent;
pub use scene::prefabs::BodySpec;
pub use world::{BodySnapshot, PlayerSnapshot, World, WorldError};

use super::level::{load_level, LevelError, LoadedLevel};
use crate::world::World;

/// Left wall, floor, a breakable block, and one box dropped onto it.
pub const DEMO_LEVEL: &str = "0:2-black,1:1-black,2:3-blue;130,90;\
0,1000,1920,80,0;0,0,100,1080,0;600,820,80,80,1;620,90,40,40,2";

/// Build and populate the demo scene.
pub fn load_demo_scene(world: &mut World) -> Result<LoadedLevel, LevelError> {
    load_level(world, DEMO_LEVEL)
}

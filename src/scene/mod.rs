pub mod demo;
pub mod level;
pub mod prefabs;

//! Textual level codes.
//!
//! A code is `;`-separated: a metadata section of comma-separated
//! `id:kind-color` entries, a player spawn `x,y`, then any number of block
//! records `x,y,w,h,id` whose `id` refers to a metadata entry.
//!
//! Kind codes: `0` decorative, `1` solid and breakable, `2` solid, `3` moveable box.

use std::collections::BTreeMap;
use std::str::FromStr;

use glam::Vec2;
use log::debug;
use thiserror::Error;

use super::prefabs::BodySpec;
use crate::components::{Aabb, BodyId};
use crate::world::World;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Material {
    Decor,
    Breakable,
    Solid,
    Moveable,
}

impl Material {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(Self::Decor),
            "1" => Some(Self::Breakable),
            "2" => Some(Self::Solid),
            "3" => Some(Self::Moveable),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MaterialEntry {
    pub material: Material,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlockRecord {
    pub aabb: Aabb,
    pub material_id: u32,
}

/// A parsed and cross-checked level, ready to spawn.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelPlan {
    pub materials: BTreeMap<u32, MaterialEntry>,
    pub spawn: Option<Vec2>,
    pub blocks: Vec<BlockRecord>,
}

impl LevelPlan {
    /// Body spec for each block, in record order.
    pub fn specs(&self) -> impl Iterator<Item = BodySpec> + '_ {
        self.blocks.iter().filter_map(|block| {
            let entry = self.materials.get(&block.material_id)?;
            let Aabb { pos, size } = block.aabb;
            let color = entry.color.as_str();
            Some(match entry.material {
                Material::Decor => BodySpec::decor(pos.x, pos.y, size.x, size.y, color),
                Material::Breakable => BodySpec::breakable(pos.x, pos.y, size.x, size.y, color),
                Material::Solid => BodySpec::solid(pos.x, pos.y, size.x, size.y, color),
                Material::Moveable => BodySpec::moveable(pos.x, pos.y, size.x, size.y, color),
            })
        })
    }
}

/// Ids handed out while spawning a level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadedLevel {
    pub player: Option<BodyId>,
    pub bodies: Vec<BodyId>,
}

#[derive(Debug, Error, PartialEq)]
pub enum LevelError {
    #[error("level code has no metadata section")]
    MissingMetadata,
    #[error("malformed metadata entry `{0}`, expected `id:kind-color`")]
    MalformedMetadata(String),
    #[error("metadata id {id} has unknown kind code `{code}`")]
    UnknownKind { id: u32, code: String },
    #[error("metadata id {0} is defined twice")]
    DuplicateMetadata(u32),
    #[error("malformed spawn `{0}`, expected `x,y`")]
    MalformedSpawn(String),
    #[error("block record `{0}` must have five fields `x,y,w,h,id`")]
    BlockArity(String),
    #[error("invalid number `{0}`")]
    BadNumber(String),
    #[error("block {index} has a non-positive size")]
    DegenerateBlock { index: usize },
    #[error("block {index} references unknown metadata id {id}")]
    UnknownMetadata { index: usize, id: u32 },
}

fn number<T: FromStr>(raw: &str) -> Result<T, LevelError> {
    raw.trim()
        .parse()
        .map_err(|_| LevelError::BadNumber(raw.trim().to_string()))
}

fn parse_metadata(section: &str) -> Result<BTreeMap<u32, MaterialEntry>, LevelError> {
    let mut materials = BTreeMap::new();
    for entry in section.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let malformed = || LevelError::MalformedMetadata(entry.to_string());
        let (id, rest) = entry.split_once(':').ok_or_else(malformed)?;
        let (code, color) = rest.split_once('-').ok_or_else(malformed)?;
        let id: u32 = number(id)?;
        let material = Material::from_code(code.trim()).ok_or_else(|| LevelError::UnknownKind {
            id,
            code: code.trim().to_string(),
        })?;
        let previous = materials.insert(
            id,
            MaterialEntry {
                material,
                color: color.trim().to_string(),
            },
        );
        if previous.is_some() {
            return Err(LevelError::DuplicateMetadata(id));
        }
    }
    Ok(materials)
}

fn parse_spawn(section: Option<&str>) -> Result<Option<Vec2>, LevelError> {
    let Some(section) = section.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let mut parts = section.split(',');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(x), Some(y), None) => Ok(Some(Vec2::new(number(x)?, number(y)?))),
        _ => Err(LevelError::MalformedSpawn(section.to_string())),
    }
}

fn parse_block(index: usize, record: &str) -> Result<BlockRecord, LevelError> {
    let fields: Vec<&str> = record.split(',').collect();
    let [x, y, w, h, id] = fields.as_slice() else {
        return Err(LevelError::BlockArity(record.to_string()));
    };
    let aabb = Aabb::new(number(x)?, number(y)?, number(w)?, number(h)?);
    if !(aabb.size.x > 0.0 && aabb.size.y > 0.0) {
        return Err(LevelError::DegenerateBlock { index });
    }
    Ok(BlockRecord {
        aabb,
        material_id: number(id)?,
    })
}

/// Parse a level code and check every block against the metadata table.
pub fn parse_level(code: &str) -> Result<LevelPlan, LevelError> {
    let mut sections = code.split(';');
    let metadata = sections
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(LevelError::MissingMetadata)?;
    let materials = parse_metadata(metadata)?;
    let spawn = parse_spawn(sections.next())?;

    let blocks = sections
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(index, record)| parse_block(index, record))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some((index, block)) = blocks
        .iter()
        .enumerate()
        .find(|(_, block)| !materials.contains_key(&block.material_id))
    {
        return Err(LevelError::UnknownMetadata {
            index,
            id: block.material_id,
        });
    }

    Ok(LevelPlan {
        materials,
        spawn,
        blocks,
    })
}

/// Parse `code` and spawn it into `world`. Nothing is spawned if parsing fails.
pub fn load_level(world: &mut World, code: &str) -> Result<LoadedLevel, LevelError> {
    let plan = parse_level(code)?;
    let player = plan.spawn.map(|pos| world.spawn_player(pos));
    let bodies: Vec<BodyId> = plan.specs().map(|spec| world.add(spec)).collect();
    debug!(
        "loaded level: {} bodies, player {}",
        bodies.len(),
        if player.is_some() { "spawned" } else { "absent" }
    );
    Ok(LoadedLevel { player, bodies })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::demo::DEMO_LEVEL;

    #[test]
    fn parses_demo_level() {
        let plan = parse_level(DEMO_LEVEL).unwrap();
        assert_eq!(plan.materials.len(), 3);
        assert_eq!(plan.materials[&1].material, Material::Breakable);
        assert_eq!(plan.materials[&2].color, "blue");
        assert_eq!(plan.spawn, Some(Vec2::new(130.0, 90.0)));
        assert_eq!(plan.blocks.len(), 4);
        assert_eq!(plan.blocks[2].aabb, Aabb::new(600.0, 820.0, 80.0, 80.0));
        assert_eq!(plan.specs().filter(|s| matches!(s, BodySpec::Moveable { .. })).count(), 1);
    }

    #[test]
    fn unknown_metadata_id_is_fatal() {
        let err = parse_level("0:2-black;10,10;0,0,10,10,7").unwrap_err();
        assert_eq!(err, LevelError::UnknownMetadata { index: 0, id: 7 });
    }

    #[test]
    fn unknown_kind_code_is_fatal() {
        let err = parse_level("0:9-black;10,10").unwrap_err();
        assert!(matches!(err, LevelError::UnknownKind { id: 0, .. }));
    }

    #[test]
    fn empty_spawn_means_no_player() {
        let plan = parse_level("0:2-black;;0,0,10,10,0").unwrap();
        assert_eq!(plan.spawn, None);
        assert_eq!(plan.blocks.len(), 1);
    }

    #[test]
    fn trailing_separator_is_ignored() {
        let plan = parse_level("0:2-black;5,5;0,0,10,10,0;").unwrap();
        assert_eq!(plan.blocks.len(), 1);
    }

    #[test]
    fn malformed_records_are_rejected() {
        assert_eq!(parse_level(""), Err(LevelError::MissingMetadata));
        assert!(matches!(parse_level("0-black;1,1"), Err(LevelError::MalformedMetadata(_))));
        assert!(matches!(parse_level("0:2-black;1"), Err(LevelError::MalformedSpawn(_))));
        assert!(matches!(parse_level("0:2-black;1,1;0,0,10,0"), Err(LevelError::BlockArity(_))));
        assert!(matches!(parse_level("0:2-black;1,1;0,0,ten,10,0"), Err(LevelError::BadNumber(_))));
        assert_eq!(
            parse_level("0:2-black;1,1;0,0,0,10,0"),
            Err(LevelError::DegenerateBlock { index: 0 })
        );
        assert_eq!(parse_level("0:2-a,0:1-b;1,1"), Err(LevelError::DuplicateMetadata(0)));
    }

    #[test]
    fn failed_load_spawns_nothing() {
        let mut world = World::default();
        assert!(load_level(&mut world, "0:2-black;10,10;0,0,10,10,4").is_err());
        assert!(world.player().is_err());
        assert_eq!(world.statics().count(), 0);
    }
}

//! Locating a tile map node, its cell pool and its tile set in a scene

use crate::error::{Error, Result};
use crate::scene::{PropertyMap, Scene, Section, Value};

/// Default name of the cell pool property on a tile map node
pub const DEFAULT_TILE_DATA_PROPERTY: &str = "tile_data";

const TILE_SET_PROPERTY: &str = "tile_set";

/// A tile map node resolved against its scene
#[derive(Debug)]
pub struct TileMap<'a> {
    pub node: &'a Section,
    pub tile_set: &'a Section,
    pub words: Vec<u32>,
}

impl<'a> TileMap<'a> {
    /// Resolve the node at `path`, read its cell pool from `property` and
    /// follow its `tile_set` reference to the tile set sub-resource.
    pub fn locate(scene: &'a Scene, path: &str, property: &str) -> Result<Self> {
        let node = scene.node(path)?;
        let words = tile_words(node.property(property)?, property)?;
        let tile_set_id = sub_resource_id(node.property(TILE_SET_PROPERTY)?, TILE_SET_PROPERTY)?;
        let tile_set = scene.sub_resource(&tile_set_id)?;

        tracing::debug!(
            node = %node.describe(),
            tile_set = %tile_set_id,
            words = words.len(),
            "located tile map"
        );
        Ok(Self { node, tile_set, words })
    }

    pub fn tile_set_properties(&self) -> &'a PropertyMap {
        &self.tile_set.properties
    }
}

/// Read an int array property as 32-bit words.
///
/// Scenes store the pool as signed ints; negatives are reinterpreted as
/// their two's complement bit pattern.
pub fn tile_words(value: &Value, property: &str) -> Result<Vec<u32>> {
    let elements = value.array_elements().ok_or_else(|| Error::InvalidProperty {
        property: property.to_string(),
        expected: "an int array",
    })?;

    elements
        .iter()
        .map(|element| {
            let v = element.as_int().ok_or_else(|| Error::InvalidProperty {
                property: property.to_string(),
                expected: "an int array",
            })?;
            if v < i64::from(i32::MIN) || v > i64::from(u32::MAX) {
                return Err(Error::TileDataOutOfRange(v));
            }
            Ok(v as u32)
        })
        .collect()
}

/// Id of a `SubResource( id )` reference
pub fn sub_resource_id(value: &Value, property: &str) -> Result<String> {
    value
        .constructor_args("SubResource")
        .and_then(|args| args.first())
        .and_then(Value::as_id)
        .ok_or_else(|| Error::InvalidProperty {
            property: property.to_string(),
            expected: "a SubResource reference",
        })
}

//! Scene to rows conversion

use std::io::Write;

use tracing::{info, warn};

use crate::codec::decode;
use crate::collision::{classify, CollisionSourceSet, Row};
use crate::error::Result;
use crate::scene::Scene;
use crate::sink::OutputFormat;
use crate::tilemap::{TileMap, DEFAULT_TILE_DATA_PROPERTY};

#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Cell pool property on the tile map node
    pub property: String,
    pub format: OutputFormat,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            property: DEFAULT_TILE_DATA_PROPERTY.to_string(),
            format: OutputFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportSummary {
    pub cells: usize,
    pub walkable: usize,
    pub blocked: usize,
}

impl ExportSummary {
    pub fn from_rows(rows: &[Row]) -> Self {
        let walkable = rows.iter().filter(|r| r.walkable).count();
        Self {
            cells: rows.len(),
            walkable,
            blocked: rows.len() - walkable,
        }
    }
}

/// Decode and classify every cell of the tile map at `node_path`.
///
/// Either every cell is converted or an error is returned; nothing is
/// produced for a partially readable pool.
pub fn convert(scene: &Scene, node_path: &str, property: &str) -> Result<Vec<Row>> {
    let tile_map = TileMap::locate(scene, node_path, property)?;
    let cells = decode(&tile_map.words)?;
    if cells.is_empty() {
        warn!(node = node_path, "tile map has no cells");
    }

    let collision_sources = CollisionSourceSet::from_properties(tile_map.tile_set_properties())?;
    let rows = classify(&cells, &collision_sources);

    let summary = ExportSummary::from_rows(&rows);
    info!(
        cells = summary.cells,
        walkable = summary.walkable,
        blocked = summary.blocked,
        collision_sources = ?collision_sources.sorted(),
        "converted tile map"
    );
    Ok(rows)
}

/// Parse `scene_text`, convert the tile map and write the rows in
/// `options.format`.
///
/// `open_output` is only called once the conversion succeeded, so a failed
/// export never creates or truncates its destination.
pub fn export<W, F>(
    scene_text: &str,
    node_path: &str,
    options: &ExportOptions,
    open_output: F,
) -> Result<ExportSummary>
where
    W: Write,
    F: FnOnce() -> Result<W>,
{
    let scene = Scene::parse(scene_text)?;
    let rows = convert(&scene, node_path, &options.property)?;
    options.format.sink(open_output()?).write_rows(&rows)?;
    Ok(ExportSummary::from_rows(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, FormatError};

    // cells: (0,0) src 0 | (1,0) src 1 | (-1,2) src 0 at atlas (3,4) | (0,-1) src 1
    const LEVEL: &str = r#"[gd_scene load_steps=3 format=2]

[sub_resource type="RectangleShape2D" id=1]
extents = Vector2( 8, 8 )

[sub_resource type="TileSet" id=2]
0/name = "wall"
0/texture = null
0/shapes = [ {
"autotile_coord": Vector2( 0, 0 ),
"one_way": false,
"one_way_margin": 1.0,
"shape": SubResource( 1 ),
"shape_transform": Transform2D( 1, 0, 0, 1, 0, 0 )
} ]
0/shape = SubResource( 1 )
1/name = "floor"
1/shapes = [  ]

[node name="Level" type="Node2D"]

[node name="TileMap" type="TileMap" parent="."]
tile_set = SubResource( 2 )
cell_size = Vector2( 16, 16 )
format = 2
tile_data = PoolIntArray( 0, 0, 0, 1, 1, 0, 196607, 0, 262147, -65536, 1, 0 )
"#;

    const LEVEL_V4: &str = r#"[gd_scene load_steps=2 format=3 uid="uid://c1x"]

[sub_resource type="TileSet" id="TileSet_k3h2x"]
2/shapes = [Vector2(0, 0)]

[node name="Root" type="Node2D"]

[node name="Ground" type="TileMap" parent="."]
tile_set = SubResource("TileSet_k3h2x")
format = 2
layer_0/name = &"ground"
layer_0/tile_data = PackedInt32Array(65537, 2, 0, 65538, 65539, 0)
"#;

    #[test]
    fn test_convert() {
        let scene = Scene::parse(LEVEL).unwrap();
        let rows = convert(&scene, "TileMap", "tile_data").unwrap();

        assert_eq!(
            rows,
            vec![
                Row { x: 0, y: 0, walkable: false },
                Row { x: 1, y: 0, walkable: true },
                Row { x: -1, y: 2, walkable: false },
                Row { x: 0, y: -1, walkable: true },
            ]
        );
    }

    #[test]
    fn test_export_csv() {
        let mut out = Vec::new();
        let target = &mut out;
        let summary = export(LEVEL, "TileMap", &ExportOptions::default(), move || Ok(target)).unwrap();

        assert_eq!(summary, ExportSummary { cells: 4, walkable: 2, blocked: 2 });
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "x,y,walkable\n0,0,False\n1,0,True\n-1,2,False\n0,-1,True\n"
        );
    }

    #[test]
    fn test_export_json_format() {
        let options = ExportOptions { format: OutputFormat::Json, ..ExportOptions::default() };
        let mut out = Vec::new();
        let target = &mut out;
        export(LEVEL, "TileMap", &options, move || Ok(target)).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.as_array().map(|rows| rows.len()), Some(4));
        assert_eq!(parsed[0], serde_json::json!({ "x": 0, "y": 0, "walkable": false }));
    }

    #[test]
    fn test_convert_child_named_like_root() {
        let text = LEVEL.replace("[node name=\"Level\"", "[node name=\"TileMap\"");
        let scene = Scene::parse(&text).unwrap();

        assert_eq!(convert(&scene, "TileMap", "tile_data").unwrap().len(), 4);
    }

    #[test]
    fn test_convert_layer_property() {
        let scene = Scene::parse(LEVEL_V4).unwrap();
        let rows = convert(&scene, "Ground", "layer_0/tile_data").unwrap();

        // second cell: source 3, alternative 1
        assert_eq!(
            rows,
            vec![
                Row { x: 1, y: 1, walkable: false },
                Row { x: 2, y: 1, walkable: true },
            ]
        );
    }

    #[test]
    fn test_truncated_pool_writes_nothing() {
        let text = LEVEL.replace("-65536, 1, 0 )", "-65536, 1 )");
        let mut opened = false;
        let err = export(&text, "TileMap", &ExportOptions::default(), || {
            opened = true;
            Ok(Vec::<u8>::new())
        })
        .unwrap_err();

        assert!(matches!(err, Error::Format(FormatError::TruncatedRecord { len: 44 })));
        assert!(!opened);
    }

    #[test]
    fn test_missing_node() {
        let err = export(LEVEL, "Walls", &ExportOptions::default(), || Ok(Vec::<u8>::new())).unwrap_err();

        assert!(matches!(err, Error::NodeNotFound(_)));
    }

    #[test]
    fn test_empty_pool() {
        let text = LEVEL.replace(
            "PoolIntArray( 0, 0, 0, 1, 1, 0, 196607, 0, 262147, -65536, 1, 0 )",
            "PoolIntArray(  )",
        );
        let scene = Scene::parse(&text).unwrap();

        assert!(convert(&scene, "TileMap", "tile_data").unwrap().is_empty());
    }
}

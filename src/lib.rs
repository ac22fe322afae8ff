//! Tile Map Export
//!
//! Decodes the packed cell pool of a tile map node in a text scene file
//! and reports every cell's grid position with a walkability flag derived
//! from the tile set's collision shapes.

pub mod codec;
pub mod collision;
pub mod error;
pub mod export;
pub mod scene;
pub mod sink;
pub mod tilemap;

pub use error::{Error, FormatError, Result};
pub use codec::{Cell, BinaryReader, decode};
pub use collision::{CollisionSourceSet, Row, classify};
pub use export::{ExportOptions, ExportSummary, convert, export};
pub use scene::{PropertyMap, Scene, Section, Value};
pub use sink::{CsvSink, JsonSink, OutputFormat, RowSink};
pub use tilemap::{TileMap, DEFAULT_TILE_DATA_PROPERTY};

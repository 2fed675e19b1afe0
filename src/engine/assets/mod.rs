// Asset management system
//
// Loads sprite sheets, their CSV descriptors and text tile maps from disk
// once, and hands out read-only handles to the results.

mod descriptor;
mod handle;
#[cfg(debug_assertions)]
mod hot_reload;
mod loader;
mod manager;
mod sprite_sheet;
mod tilemap;

pub use handle::{AssetHandle, AssetId, MapHandle, SheetHandle};
pub use loader::AssetLoader;
pub use manager::{AssetManager, CachedMap};
pub use sprite_sheet::{Frame, SpriteSheet};
pub use tilemap::{TileLegend, TileMap};

#[allow(unused_imports)]
pub use descriptor::{parse_descriptor, DescriptorRecord};
#[allow(unused_imports)]
pub use manager::{AssetStats, Reloaded};
#[allow(unused_imports)]
pub use sprite_sheet::FrameGrid;

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to decode image {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Malformed descriptor at line {line}: {reason}")]
    Descriptor { line: u64, reason: String },

    #[error(
        "Descriptor entry {name:?} references row {row} frames {start}..={end}, \
         but the sheet has {rows} rows of {columns} frames"
    )]
    IndexOutOfRange {
        name: String,
        row: usize,
        start: usize,
        end: usize,
        rows: usize,
        columns: usize,
    },

    #[error("Unknown animation or tile name: {0}")]
    UnknownAnimation(String),

    #[error("No tile bound to character {ch:?} at row {row}, column {col}")]
    UnknownTile { ch: char, row: usize, col: usize },

    #[error("Frame size must be greater than zero")]
    ZeroFrameSize,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_error_display() {
        let err = AssetError::NotFound("static/castle2.png".to_string());
        assert_eq!(err.to_string(), "Asset not found: static/castle2.png");
    }

    #[test]
    fn test_out_of_range_display_names_entry() {
        let err = AssetError::IndexOutOfRange {
            name: "East".to_string(),
            row: 9,
            start: 0,
            end: 8,
            rows: 4,
            columns: 9,
        };
        let message = err.to_string();
        assert!(message.contains("\"East\""));
        assert!(message.contains("row 9"));
        assert!(message.contains("4 rows of 9 frames"));
    }

    #[test]
    fn test_unknown_tile_display() {
        let err = AssetError::UnknownTile {
            ch: 'X',
            row: 2,
            col: 7,
        };
        assert_eq!(
            err.to_string(),
            "No tile bound to character 'X' at row 2, column 7"
        );
    }
}

// Text tile maps
//
// Each character of a plain-text grid names a tile through a legend. The map
// resolves every cell to the first frame of its tile and paints the result
// once into an off-screen image.

use super::sprite_sheet::{Frame, SpriteSheet};
use super::{loader, AssetError};
use glam::UVec2;
use image::{imageops, RgbaImage};
use log::debug;
use std::collections::HashMap;
use std::path::Path;

/// Character to tile-name table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLegend {
    tiles: HashMap<char, String>,
    fallback: Option<String>,
}

impl TileLegend {
    /// Empty legend; every character is unknown
    pub fn new() -> Self {
        Self {
            tiles: HashMap::new(),
            fallback: None,
        }
    }

    /// Legend for the castle tile set
    pub fn castle() -> Self {
        Self::new()
            .with_tile('W', "CastleMiddle")
            .with_tile('C', "CastleCross")
            .with_tile('D', "CastleEmpty")
            .with_tile('O', "CastleWindow")
            .with_tile(' ', "CastleEmpty")
    }

    pub fn insert(&mut self, ch: char, name: &str) {
        self.tiles.insert(ch, name.to_string());
    }

    pub fn with_tile(mut self, ch: char, name: &str) -> Self {
        self.insert(ch, name);
        self
    }

    /// Tile used for characters the legend does not name
    pub fn with_fallback(mut self, name: &str) -> Self {
        self.fallback = Some(name.to_string());
        self
    }

    /// Tile name for `ch`, falling back to the designated unknown tile
    pub fn resolve(&self, ch: char) -> Option<&str> {
        self.tiles
            .get(&ch)
            .or(self.fallback.as_ref())
            .map(String::as_str)
    }
}

impl Default for TileLegend {
    fn default() -> Self {
        Self::castle()
    }
}

/// A text grid resolved to sheet frames
#[derive(Debug, Clone)]
pub struct TileMap {
    /// Resolved frames, one row per text line (row 0 is the first line)
    cells: Vec<Vec<Frame>>,
    width: usize,
    tile_size: u32,
}

impl TileMap {
    /// Resolve every character of `text` against `legend` and `sheet`
    pub fn parse(text: &str, legend: &TileLegend, sheet: &SpriteSheet) -> Result<Self, AssetError> {
        let mut cells = Vec::new();
        let mut width = 0;

        for (row, line) in text.lines().enumerate() {
            let mut frames = Vec::with_capacity(line.len());
            for (col, ch) in line.chars().enumerate() {
                let name = legend
                    .resolve(ch)
                    .ok_or(AssetError::UnknownTile { ch, row, col })?;
                frames.push(sheet.first_frame(name)?);
            }
            width = width.max(frames.len());
            cells.push(frames);
        }

        debug!("Parsed {}x{} tile map", width, cells.len());

        Ok(Self {
            cells,
            width,
            tile_size: sheet.frame_size(),
        })
    }

    /// Read and resolve a map file
    pub fn load(path: &Path, legend: &TileLegend, sheet: &SpriteSheet) -> Result<Self, AssetError> {
        let text = loader::read_text(path)?;
        Self::parse(&text, legend, sheet)
    }

    /// Width in tiles (longest line)
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles (line count)
    pub fn height(&self) -> usize {
        self.cells.len()
    }

    /// Size of the rasterized surface in pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            self.width as u32 * self.tile_size,
            self.height() as u32 * self.tile_size,
        )
    }

    /// Frame of the cell at text column `col`, line `row`
    pub fn cell(&self, col: usize, row: usize) -> Option<Frame> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Frame at tile coordinate (`x`, `y`) with Y growing upward from the
    /// bottom of the map
    pub fn tile_at_canvas(&self, x: usize, y: usize) -> Option<Frame> {
        let row = self.height().checked_sub(y + 1)?;
        self.cell(x, row)
    }

    /// Pixel position of a cell on a Y-up canvas
    pub fn canvas_origin(&self, col: usize, row: usize) -> UVec2 {
        let flipped = self.height().saturating_sub(row + 1);
        UVec2::new(
            col as u32 * self.tile_size,
            flipped as u32 * self.tile_size,
        )
    }

    /// Paint every cell into a transparent image
    ///
    /// Images grow downward, so line `row` lands at pixel row `row * tile_size`.
    /// Cells missing from short lines stay transparent.
    pub fn rasterize(&self, sheet: &SpriteSheet) -> RgbaImage {
        let (width, height) = self.pixel_size();
        let mut canvas = RgbaImage::new(width, height);

        for (row, frames) in self.cells.iter().enumerate() {
            for (col, frame) in frames.iter().enumerate() {
                let tile =
                    imageops::crop_imm(sheet.image(), frame.x, frame.y, frame.width, frame.height)
                        .to_image();
                imageops::replace(
                    &mut canvas,
                    &tile,
                    col as i64 * self.tile_size as i64,
                    row as i64 * self.tile_size as i64,
                );
            }
        }

        canvas
    }
}

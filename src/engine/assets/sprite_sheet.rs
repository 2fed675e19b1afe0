// Sprite sheet indexing
//
// A sheet is cut into a grid of square frames. Named frame ranges from a
// descriptor table address animations and tile sets inside that grid.

use super::descriptor::{parse_descriptor, DescriptorRecord};
use super::{loader, AssetError};
use glam::Vec2;
use image::RgbaImage;
use log::debug;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// A rectangle inside a sprite sheet, in image pixels (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Frame covering a whole image
    /// Size in pixels
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Top-left UV coordinate for a sheet of the given size
    pub fn uv_min(&self, sheet_width: u32, sheet_height: u32) -> Vec2 {
        Vec2::new(
            self.x as f32 / sheet_width as f32,
            self.y as f32 / sheet_height as f32,
        )
    }

    /// Bottom-right UV coordinate for a sheet of the given size
    pub fn uv_max(&self, sheet_width: u32, sheet_height: u32) -> Vec2 {
        Vec2::new(
            (self.x + self.width) as f32 / sheet_width as f32,
            (self.y + self.height) as f32 / sheet_height as f32,
        )
    }
}

/// Fixed grid of square frames covering a sheet
///
/// Row 0 is the topmost row. Trailing pixels that do not fill a whole frame
/// are dropped.
#[derive(Debug, Clone)]
pub struct FrameGrid {
    frame_size: u32,
    rows: Vec<Vec<Frame>>,
}

impl FrameGrid {
    /// Partition a `width`x`height` sheet into `frame_size` squares
    pub fn new(width: u32, height: u32, frame_size: u32) -> Result<Self, AssetError> {
        if frame_size == 0 {
            return Err(AssetError::ZeroFrameSize);
        }

        let row_count = height / frame_size;
        let column_count = width / frame_size;

        let rows = (0..row_count)
            .map(|row| {
                (0..column_count)
                    .map(|col| {
                        Frame::new(col * frame_size, row * frame_size, frame_size, frame_size)
                    })
                    .collect()
            })
            .collect();

        Ok(Self { frame_size, rows })
    }

    pub fn frame_size(&self) -> u32 {
        self.frame_size
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn columns(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    #[cfg(test)]
    pub fn frame(&self, row: usize, col: usize) -> Option<Frame> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Frames `start..=end` of `row`
    pub fn slice(&self, record: &DescriptorRecord) -> Result<&[Frame], AssetError> {
        self.rows
            .get(record.row)
            .filter(|_| record.start <= record.end)
            .and_then(|row| row.get(record.start..=record.end))
            .ok_or_else(|| AssetError::IndexOutOfRange {
                name: record.name.clone(),
                row: record.row,
                start: record.start,
                end: record.end,
                rows: self.rows(),
                columns: self.columns(),
            })
    }
}

/// A decoded sheet image together with its frame grid and named ranges
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    image: RgbaImage,
    grid: FrameGrid,
    entries: HashMap<String, Vec<Frame>>,
}

impl SpriteSheet {
    /// Build an index with no named ranges
    pub fn from_image(image: RgbaImage, frame_size: u32) -> Result<Self, AssetError> {
        let grid = FrameGrid::new(image.width(), image.height(), frame_size)?;
        debug!(
            "Sliced {}x{} sheet into {} rows of {} frames",
            image.width(),
            image.height(),
            grid.rows(),
            grid.columns()
        );

        Ok(Self {
            image,
            grid,
            entries: HashMap::new(),
        })
    }

    /// Load a sheet image and bind every record of its descriptor
    pub fn load(
        sheet_path: &Path,
        descriptor_path: &Path,
        frame_size: u32,
    ) -> Result<Self, AssetError> {
        let image = loader::read_image(sheet_path)?;
        let mut sheet = Self::from_image(image, frame_size)?;

        let descriptor = loader::open_file(descriptor_path)?;
        sheet.bind_descriptor(descriptor)?;

        Ok(sheet)
    }

    /// Bind all records of a descriptor table
    pub fn bind_descriptor<R: Read>(&mut self, reader: R) -> Result<(), AssetError> {
        for record in parse_descriptor(reader)? {
            self.bind(&record)?;
        }
        Ok(())
    }

    /// Bind one named range; a repeated name replaces the earlier range
    pub fn bind(&mut self, record: &DescriptorRecord) -> Result<(), AssetError> {
        let frames = self.grid.slice(record)?.to_vec();
        debug!(
            "Bound {:?} to row {} frames {}..={}",
            record.name, record.row, record.start, record.end
        );
        self.entries.insert(record.name.clone(), frames);
        Ok(())
    }

    /// Frames bound to `name`
    pub fn frames(&self, name: &str) -> Result<&[Frame], AssetError> {
        self.entries
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| AssetError::UnknownAnimation(name.to_string()))
    }

    /// First frame bound to `name`
    pub fn first_frame(&self, name: &str) -> Result<Frame, AssetError> {
        self.frames(name)?
            .first()
            .copied()
            .ok_or_else(|| AssetError::UnknownAnimation(name.to_string()))
    }

    #[cfg(test)]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[cfg(test)]
    pub fn grid(&self) -> &FrameGrid {
        &self.grid
    }

    pub fn frame_size(&self) -> u32 {
        self.grid.frame_size()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_sheet(width: u32, height: u32, frame_size: u32) -> SpriteSheet {
        SpriteSheet::from_image(RgbaImage::new(width, height), frame_size).unwrap()
    }

    #[test]
    fn test_grid_dimensions_divisible() {
        let grid = FrameGrid::new(576, 256, 64).unwrap();
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.columns(), 9);

        for row in 0..grid.rows() {
            for col in 0..grid.columns() {
                let frame = grid.frame(row, col).unwrap();
                assert_eq!(frame.width, 64);
                assert_eq!(frame.height, 64);
                assert_eq!(frame.x, col as u32 * 64);
                assert_eq!(frame.y, row as u32 * 64);
            }
        }
    }

    #[test]
    fn test_grid_drops_partial_frames() {
        let grid = FrameGrid::new(100, 70, 32).unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.columns(), 3);
        assert!(grid.frame(2, 0).is_none());
        assert!(grid.frame(0, 3).is_none());
    }

    #[test]
    fn test_grid_smaller_than_frame() {
        let grid = FrameGrid::new(16, 16, 32).unwrap();
        assert_eq!(grid.rows(), 0);
        assert_eq!(grid.columns(), 0);
    }

    #[test]
    fn test_zero_frame_size_rejected() {
        assert!(matches!(
            FrameGrid::new(64, 64, 0),
            Err(AssetError::ZeroFrameSize)
        ));
    }

    #[test]
    fn test_frame_uv() {
        let frame = Frame::new(64, 0, 64, 64);
        assert_eq!(frame.uv_min(256, 256), Vec2::new(0.25, 0.0));
        assert_eq!(frame.uv_max(256, 256), Vec2::new(0.5, 0.25));
    }

    #[test]
    fn test_bind_inclusive_range() {
        let mut sheet = blank_sheet(320, 192, 64);
        sheet
            .bind(&DescriptorRecord::new("East", 1, 2, 4))
            .unwrap();

        let frames = sheet.frames("East").unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0], sheet.grid().frame(1, 2).unwrap());
        assert_eq!(frames[1], sheet.grid().frame(1, 3).unwrap());
        assert_eq!(frames[2], sheet.grid().frame(1, 4).unwrap());
    }

    #[test]
    fn test_bind_descriptor_table() {
        let mut sheet = blank_sheet(576, 256, 64);
        sheet
            .bind_descriptor("South,2,0,8\nEast,3,0,8\nWest,1,0,8\nNorth,0,0,8\n".as_bytes())
            .unwrap();

        assert!(sheet.contains("South"));
        assert_eq!(sheet.frames("North").unwrap().len(), 9);
        assert_eq!(sheet.first_frame("South").unwrap(), Frame::new(0, 128, 64, 64));
        assert_eq!(sheet.names().count(), 4);
    }

    #[test]
    fn test_rebinding_replaces_range() {
        let mut sheet = blank_sheet(128, 128, 64);
        sheet.bind(&DescriptorRecord::new("Tile", 0, 0, 1)).unwrap();
        sheet.bind(&DescriptorRecord::new("Tile", 1, 1, 1)).unwrap();

        assert_eq!(sheet.frames("Tile").unwrap(), &[Frame::new(64, 64, 64, 64)]);
    }

    #[test]
    fn test_row_out_of_range() {
        let mut sheet = blank_sheet(128, 128, 64);
        let err = sheet
            .bind(&DescriptorRecord::new("North", 2, 0, 1))
            .unwrap_err();

        match err {
            AssetError::IndexOutOfRange {
                name,
                row,
                rows,
                columns,
                ..
            } => {
                assert_eq!(name, "North");
                assert_eq!(row, 2);
                assert_eq!(rows, 2);
                assert_eq!(columns, 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_end_frame_out_of_range() {
        let mut sheet = blank_sheet(128, 128, 64);
        let err = sheet
            .bind_descriptor("East,0,0,2\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, AssetError::IndexOutOfRange { end: 2, .. }));
        assert!(!sheet.contains("East"));
    }

    #[test]
    fn test_unknown_name() {
        let sheet = blank_sheet(64, 64, 64);
        assert!(matches!(
            sheet.frames("South"),
            Err(AssetError::UnknownAnimation(name)) if name == "South"
        ));
    }

    #[test]
    fn test_load_missing_sheet() {
        let err = SpriteSheet::load(
            Path::new("/nonexistent/sheet.png"),
            Path::new("/nonexistent/sheet.csv"),
            32,
        )
        .unwrap_err();
        assert!(matches!(err, AssetError::NotFound(_)));
    }
}

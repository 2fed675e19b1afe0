// Game configuration
//
// Defaults reproduce the stock castle level. An INI file can override any of
// them; keys that are absent keep their current value.
//
// ```ini
// [window]
// title = PowerKids!
// width = 1024
// height = 768
//
// [assets]
// root = .
// character_sheet = static/LPC_Sara/SaraFullSheet.png
// character_descriptor = static/LPC_Sara/SaraAnimations.csv
// character_frame_size = 64
// tile_sheet = static/castle2.png
// tile_descriptor = static/castle2.csv
// tile_frame_size = 32
// map = maps/castle-one/castleMap.txt
// unknown_tile = CastleEmpty
//
// [animation]
// frame_rate = 0
//
// [camera]
// follow = true
//
// [time]
// slow_motion_divisor = 8
// ```

use crate::engine::assets::TileLegend;
use crate::game::characters::FrameMode;
use crate::game::SceneSettings;
use anyhow::{anyhow, bail, Context, Result};
use configparser::ini::Ini;
use log::info;
use std::path::{Path, PathBuf};

const DEFAULT_TITLE: &str = "PowerKids!";
const DEFAULT_WINDOW_WIDTH: u32 = 1024;
const DEFAULT_WINDOW_HEIGHT: u32 = 768;
pub const DEFAULT_CONFIG_PATH: &str = "powerkids.ini";

/// Where one sprite sheet and its descriptor live
#[derive(Debug, Clone, PartialEq)]
pub struct SheetConfig {
    pub image: String,
    pub descriptor: String,
    pub frame_size: u32,
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub title: String,
    pub window_width: u32,
    pub window_height: u32,
    /// Directory every asset path is relative to
    pub asset_root: PathBuf,
    pub character_sheet: SheetConfig,
    pub tile_sheet: SheetConfig,
    pub map: String,
    /// Tile painted for map characters the legend does not know; unset
    /// makes them a load error
    pub unknown_tile: Option<String>,
    /// Animation frames per second; 0 keeps a static pose
    pub animation_frame_rate: f32,
    pub camera_follow: bool,
    pub slow_motion_divisor: f32,
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            asset_root: PathBuf::from("."),
            character_sheet: SheetConfig {
                image: "static/LPC_Sara/SaraFullSheet.png".to_string(),
                descriptor: "static/LPC_Sara/SaraAnimations.csv".to_string(),
                frame_size: 64,
            },
            tile_sheet: SheetConfig {
                image: "static/castle2.png".to_string(),
                descriptor: "static/castle2.csv".to_string(),
                frame_size: 32,
            },
            map: "maps/castle-one/castleMap.txt".to_string(),
            unknown_tile: None,
            animation_frame_rate: 0.0,
            camera_follow: true,
            slow_motion_divisor: 8.0,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Overlay values from `config_path`
    pub fn load_from_file(&mut self) -> Result<()> {
        let mut ini = Ini::new();
        ini.load(&self.config_path)
            .map_err(|e| anyhow!("failed to load config file {:?}: {e}", self.config_path))?;
        self.apply(&ini)
            .with_context(|| format!("invalid config file {:?}", self.config_path))?;

        info!(
            "Loaded config: {}x{} window, assets in {:?}, frame_rate={}, camera_follow={}",
            self.window_width,
            self.window_height,
            self.asset_root,
            self.animation_frame_rate,
            self.camera_follow
        );
        Ok(())
    }

    /// Overlay values from INI text
    pub fn load_from_str(&mut self, text: &str) -> Result<()> {
        let mut ini = Ini::new();
        ini.read(text.to_string())
            .map_err(|e| anyhow!("failed to parse config: {e}"))?;
        self.apply(&ini)
    }

    fn apply(&mut self, ini: &Ini) -> Result<()> {
        // [window]
        if let Some(title) = ini.get("window", "title") {
            self.title = title;
        }
        if let Some(width) = read_uint(ini, "window", "width")? {
            self.window_width = width;
        }
        if let Some(height) = read_uint(ini, "window", "height")? {
            self.window_height = height;
        }

        // [assets]
        if let Some(root) = ini.get("assets", "root") {
            self.asset_root = PathBuf::from(root);
        }
        apply_sheet(ini, "character", &mut self.character_sheet)?;
        apply_sheet(ini, "tile", &mut self.tile_sheet)?;
        if let Some(map) = ini.get("assets", "map") {
            self.map = map;
        }
        if let Some(tile) = ini.get("assets", "unknown_tile") {
            self.unknown_tile = Some(tile).filter(|t| !t.is_empty());
        }

        // [animation]
        if let Some(rate) = read_float(ini, "animation", "frame_rate")? {
            self.animation_frame_rate = rate;
        }

        // [camera]
        if let Some(follow) = ini
            .getbool("camera", "follow")
            .map_err(|e| anyhow!("[camera] follow: {e}"))?
        {
            self.camera_follow = follow;
        }

        // [time]
        if let Some(divisor) = read_float(ini, "time", "slow_motion_divisor")? {
            self.slow_motion_divisor = divisor;
        }

        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.window_width == 0 || self.window_height == 0 {
            bail!("window size must be non-zero");
        }
        if self.character_sheet.frame_size == 0 || self.tile_sheet.frame_size == 0 {
            bail!("frame sizes must be non-zero");
        }
        if !self.animation_frame_rate.is_finite() || self.animation_frame_rate < 0.0 {
            bail!("[animation] frame_rate must be a finite, non-negative number");
        }
        if !self.slow_motion_divisor.is_finite() || self.slow_motion_divisor <= 0.0 {
            bail!("[time] slow_motion_divisor must be a finite, positive number");
        }
        Ok(())
    }

    /// Point assets at `root` (command line override)
    pub fn set_asset_root(&mut self, root: &Path) {
        self.asset_root = root.to_path_buf();
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    /// Castle legend, with the configured tile for unknown characters
    pub fn tile_legend(&self) -> TileLegend {
        match &self.unknown_tile {
            Some(tile) => TileLegend::castle().with_fallback(tile),
            None => TileLegend::castle(),
        }
    }

    pub fn scene_settings(&self) -> SceneSettings {
        SceneSettings {
            frame_mode: FrameMode::from_frame_rate(self.animation_frame_rate),
            camera_follow: self.camera_follow,
            slow_motion_divisor: self.slow_motion_divisor,
        }
    }
}

fn apply_sheet(ini: &Ini, prefix: &str, sheet: &mut SheetConfig) -> Result<()> {
    if let Some(image) = ini.get("assets", &format!("{prefix}_sheet")) {
        sheet.image = image;
    }
    if let Some(descriptor) = ini.get("assets", &format!("{prefix}_descriptor")) {
        sheet.descriptor = descriptor;
    }
    if let Some(frame_size) = read_uint(ini, "assets", &format!("{prefix}_frame_size"))? {
        sheet.frame_size = frame_size;
    }
    Ok(())
}

fn read_uint(ini: &Ini, section: &str, key: &str) -> Result<Option<u32>> {
    let value = ini
        .getuint(section, key)
        .map_err(|e| anyhow!("[{section}] {key}: {e}"))?;
    value
        .map(|v| u32::try_from(v).with_context(|| format!("[{section}] {key} is out of range")))
        .transpose()
}

fn read_float(ini: &Ini, section: &str, key: &str) -> Result<Option<f32>> {
    let value = ini
        .getfloat(section, key)
        .map_err(|e| anyhow!("[{section}] {key}: {e}"))?;
    Ok(value.map(|v| v as f32))
}

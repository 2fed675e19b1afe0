// Central asset management system

#[cfg(debug_assertions)]
use super::hot_reload::HotReloadWatcher;
use super::{
    AssetHandle, AssetId, AssetLoader, MapHandle, SheetHandle, SpriteSheet, TileLegend, TileMap,
};
use anyhow::{Context, Result};
use image::RgbaImage;
use log::info;
#[cfg(debug_assertions)]
use log::warn;
use std::collections::HashMap;

/// A tile map together with its rasterized surface
///
/// Built once at load time and reused for every frame.
#[derive(Debug, Clone)]
pub struct CachedMap {
    pub tiles: TileMap,
    pub image: RgbaImage,
}

struct SheetEntry {
    sheet: SpriteSheet,
    image_name: String,
    descriptor_name: String,
    frame_size: u32,
}

struct MapEntry {
    map: CachedMap,
    map_name: String,
    sheet: SheetHandle,
    legend: TileLegend,
}

/// Assets whose cached data was rebuilt by a hot reload
#[derive(Debug, Default, Clone)]
pub struct Reloaded {
    pub sheets: Vec<SheetHandle>,
    pub maps: Vec<MapHandle>,
}

impl Reloaded {
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty() && self.maps.is_empty()
    }
}

/// Owns every sprite sheet and tile map and hands out read-only handles
pub struct AssetManager {
    loader: AssetLoader,

    /// Hot reload watcher (only in dev mode)
    #[cfg(debug_assertions)]
    hot_reload: HotReloadWatcher,

    sheets: HashMap<AssetId, SheetEntry>,
    maps: HashMap<AssetId, MapEntry>,
}

impl AssetManager {
    pub fn new(loader: AssetLoader) -> Self {
        Self {
            loader,
            #[cfg(debug_assertions)]
            hot_reload: HotReloadWatcher::new(true),
            sheets: HashMap::new(),
            maps: HashMap::new(),
        }
    }

    /// Load a sprite sheet and its descriptor, or return the cached handle
    pub fn load_sheet(
        &mut self,
        image_name: &str,
        descriptor_name: &str,
        frame_size: u32,
    ) -> Result<SheetHandle> {
        let id = AssetId::from_parts(&[image_name, descriptor_name, &frame_size.to_string()]);
        if self.sheets.contains_key(&id) {
            return Ok(AssetHandle::new(id));
        }

        let sheet = self.build_sheet(image_name, descriptor_name, frame_size)?;
        info!(
            "Loaded sprite sheet {} ({} named ranges)",
            image_name,
            sheet.names().count()
        );

        #[cfg(debug_assertions)]
        {
            let _ = self
                .hot_reload
                .watch_file(self.loader.resolve_path(image_name), id);
            let _ = self
                .hot_reload
                .watch_file(self.loader.resolve_path(descriptor_name), id);
        }

        self.sheets.insert(
            id,
            SheetEntry {
                sheet,
                image_name: image_name.to_string(),
                descriptor_name: descriptor_name.to_string(),
                frame_size,
            },
        );

        Ok(AssetHandle::new(id))
    }

    /// Load a text tile map against a loaded sheet, or return the cached handle
    pub fn load_map(
        &mut self,
        map_name: &str,
        sheet: SheetHandle,
        legend: TileLegend,
    ) -> Result<MapHandle> {
        let id = AssetId::from_parts(&[map_name, &sheet.id().as_u64().to_string()]);
        if self.maps.contains_key(&id) {
            return Ok(AssetHandle::new(id));
        }

        let map = self.build_map(map_name, sheet, &legend)?;
        let (width, height) = map.tiles.pixel_size();
        info!("Rasterized map {} into {}x{} surface", map_name, width, height);

        #[cfg(debug_assertions)]
        {
            let _ = self
                .hot_reload
                .watch_file(self.loader.resolve_path(map_name), id);
        }

        self.maps.insert(
            id,
            MapEntry {
                map,
                map_name: map_name.to_string(),
                sheet,
                legend,
            },
        );

        Ok(AssetHandle::new(id))
    }

    pub fn sheet(&self, handle: SheetHandle) -> Option<&SpriteSheet> {
        self.sheets.get(&handle.id()).map(|entry| &entry.sheet)
    }

    pub fn map(&self, handle: MapHandle) -> Option<&CachedMap> {
        self.maps.get(&handle.id()).map(|entry| &entry.map)
    }

    fn build_sheet(
        &self,
        image_name: &str,
        descriptor_name: &str,
        frame_size: u32,
    ) -> Result<SpriteSheet> {
        SpriteSheet::load(
            &self.loader.resolve_path(image_name),
            &self.loader.resolve_path(descriptor_name),
            frame_size,
        )
        .context("error loading animation sheet")
    }

    fn build_map(&self, map_name: &str, sheet: SheetHandle, legend: &TileLegend) -> Result<CachedMap> {
        let sheet = self
            .sheet(sheet)
            .context("map refers to a sprite sheet that is not loaded")?;
        let tiles = TileMap::load(&self.loader.resolve_path(map_name), legend, sheet)
            .context("error loading map from text")?;
        let image = tiles.rasterize(sheet);
        Ok(CachedMap { tiles, image })
    }

    /// Rebuild assets whose source files changed (dev mode only)
    ///
    /// A reloaded sheet also rebuilds every map painted from it. Failed
    /// rebuilds keep the previous version.
    #[cfg(debug_assertions)]
    pub fn check_hot_reload(&mut self) -> Reloaded {
        let stale = self.hot_reload.poll();
        let mut reloaded = Reloaded::default();
        if stale.is_empty() {
            return reloaded;
        }

        for id in &stale {
            let Some(entry) = self.sheets.get(id) else {
                continue;
            };
            match self.build_sheet(&entry.image_name, &entry.descriptor_name, entry.frame_size) {
                Ok(sheet) => {
                    info!("Reloaded sprite sheet {}", entry.image_name);
                    if let Some(entry) = self.sheets.get_mut(id) {
                        entry.sheet = sheet;
                    }
                    reloaded.sheets.push(AssetHandle::new(*id));
                }
                Err(e) => warn!("Keeping previous sprite sheet: {:#}", e),
            }
        }

        let map_ids: Vec<AssetId> = self
            .maps
            .iter()
            .filter(|(id, entry)| stale.contains(*id) || reloaded.sheets.contains(&entry.sheet))
            .map(|(id, _)| *id)
            .collect();

        for id in map_ids {
            let Some(entry) = self.maps.get(&id) else {
                continue;
            };
            match self.build_map(&entry.map_name, entry.sheet, &entry.legend) {
                Ok(map) => {
                    info!("Reloaded map {}", entry.map_name);
                    if let Some(entry) = self.maps.get_mut(&id) {
                        entry.map = map;
                    }
                    reloaded.maps.push(AssetHandle::new(id));
                }
                Err(e) => warn!("Keeping previous map: {:#}", e),
            }
        }

        reloaded
    }

    /// Get statistics about loaded assets
    pub fn stats(&self) -> AssetStats {
        AssetStats {
            sheet_count: self.sheets.len(),
            map_count: self.maps.len(),
        }
    }
}

/// Statistics about loaded assets
#[derive(Debug, Clone, Copy)]
pub struct AssetStats {
    pub sheet_count: usize,
    pub map_count: usize,
}

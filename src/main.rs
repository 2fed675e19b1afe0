use anyhow::{anyhow, Context, Result};
use clap::Parser;
use glam::Vec2;
use log::{error, info};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use winit::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

mod config;
mod core;
mod engine;
mod game;

use config::GameConfig;
use engine::assets::{AssetLoader, AssetManager, CachedMap, MapHandle, SheetHandle};
use engine::game_loop::GameLoop;
use engine::input::{Action, InputManager};
use engine::renderer::{DrawTarget, Renderer};
use game::{Scene, SceneTextures};

/// PowerKids! castle walkabout
#[derive(Parser)]
#[command(version, about = "Walk a character around a tiled castle map")]
struct Cli {
    /// INI file overriding the built-in defaults
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory the asset paths are relative to
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,
}

/// Handles of everything the scene is built from
struct LoadedAssets {
    character: SheetHandle,
    castle_map: MapHandle,
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = GameConfig::with_path(path);
            config.load_from_file()?;
            config
        }
        None => {
            let mut config = GameConfig::new();
            if config.config_path.exists() {
                config.load_from_file()?;
            } else {
                info!("No {:?} found, using default settings", config.config_path);
            }
            config
        }
    };

    if let Some(root) = &cli.assets {
        config.set_asset_root(root);
    }
    Ok(config)
}

fn load_assets(assets: &mut AssetManager, config: &GameConfig) -> Result<LoadedAssets> {
    let character = assets.load_sheet(
        &config.character_sheet.image,
        &config.character_sheet.descriptor,
        config.character_sheet.frame_size,
    )?;
    let tiles = assets.load_sheet(
        &config.tile_sheet.image,
        &config.tile_sheet.descriptor,
        config.tile_sheet.frame_size,
    )?;
    let castle_map = assets.load_map(&config.map, tiles, config.tile_legend())?;

    let stats = assets.stats();
    info!(
        "Assets ready: {} sheets, {} maps",
        stats.sheet_count, stats.map_count
    );

    Ok(LoadedAssets {
        character,
        castle_map,
    })
}

fn map_size(map: &CachedMap) -> Vec2 {
    let (width, height) = map.tiles.pixel_size();
    Vec2::new(width as f32, height as f32)
}

/// Push rebuilt assets to the GPU and the scene
#[cfg(debug_assertions)]
fn apply_hot_reload(
    assets: &mut AssetManager,
    loaded: &LoadedAssets,
    textures: SceneTextures,
    scene: &mut Scene,
    renderer: &mut Renderer,
) {
    use log::warn;

    let reloaded = assets.check_hot_reload();
    if reloaded.is_empty() {
        return;
    }

    if reloaded.sheets.contains(&loaded.character) {
        if let Some(sheet) = assets.sheet(loaded.character) {
            if let Err(e) = scene.rebind_character(sheet) {
                warn!("Keeping previous character animations: {e}");
            } else if let Err(e) =
                renderer.replace_image(textures.character, sheet.image(), "character sheet")
            {
                warn!("Failed to upload reloaded character sheet: {e:#}");
            }
        }
    }

    if reloaded.maps.contains(&loaded.castle_map) {
        if let Some(map) = assets.map(loaded.castle_map) {
            match renderer.replace_image(textures.map, &map.image, "castle map") {
                Ok(()) => scene.set_map_size(map_size(map)),
                Err(e) => warn!("Failed to upload reloaded map: {e:#}"),
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    info!("Starting {}...", config.title);

    let mut assets = AssetManager::new(AssetLoader::new(&config.asset_root));
    let loaded = load_assets(&mut assets, &config)?;
    let character_sheet = assets
        .sheet(loaded.character)
        .context("character sheet missing after load")?;
    let castle = assets
        .map(loaded.castle_map)
        .context("castle map missing after load")?;

    let (width, height) = config.window_size();
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(width, height))
            .with_resizable(true)
            .build(&event_loop)?,
    );

    info!("Window created successfully");

    let mut renderer = pollster::block_on(Renderer::new(window.clone()))?;
    let textures = SceneTextures {
        character: renderer.upload_image(character_sheet.image(), "character sheet")?,
        map: renderer.upload_image(&castle.image, "castle map")?,
    };
    let mut scene = Scene::new(
        character_sheet,
        textures,
        map_size(castle),
        config.scene_settings(),
    )?;

    let mut input = InputManager::default();
    let mut game_loop = GameLoop::new();
    let fatal: Rc<RefCell<Option<anyhow::Error>>> = Rc::new(RefCell::new(None));
    let fatal_in_loop = Rc::clone(&fatal);

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    info!("Close requested, shutting down...");
                    elwt.exit();
                }
                WindowEvent::Resized(physical_size) => renderer.resize(physical_size),
                WindowEvent::Focused(false) => input.reset(),
                WindowEvent::KeyboardInput { event, .. } => input.process_keyboard_event(&event),
                WindowEvent::RedrawRequested => {
                    if input.just_pressed(Action::Quit) {
                        info!("Quit requested after {} frames", game_loop.frame_count());
                        elwt.exit();
                        return;
                    }

                    #[cfg(debug_assertions)]
                    apply_hot_reload(&mut assets, &loaded, textures, &mut scene, &mut renderer);

                    let dt = game_loop.begin_frame();
                    scene.update(dt, &input);
                    input.end_frame();

                    scene.draw(&mut renderer);
                    if let Err(e) = renderer.present() {
                        error!("Rendering failed: {e:#}");
                        *fatal_in_loop.borrow_mut() = Some(e);
                        elwt.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => window.request_redraw(),
            _ => {}
        })
        .map_err(|e| anyhow!("Event loop error: {}", e))?;

    let failure = fatal.borrow_mut().take();
    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

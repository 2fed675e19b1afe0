// Engine modules: assets, input, renderer, frame timing

pub mod assets;
pub mod game_loop;
pub mod input;
pub mod renderer;

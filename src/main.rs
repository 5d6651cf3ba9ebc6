use tile_adventure::{window_conf, Game, GameConfig};

#[macroquad::main(window_conf)]
async fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    // Set panic hook for native builds to capture crash info
    #[cfg(not(target_arch = "wasm32"))]
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: {}", panic_info);
        if let Some(location) = panic_info.location() {
            eprintln!("  at {}:{}:{}", location.file(), location.line(), location.column());
        }
    }));

    let config = GameConfig::load();
    match Game::load(config).await {
        Ok(game) => game.run().await,
        Err(e) => log::error!("Failed to start: {}", e),
    }
}

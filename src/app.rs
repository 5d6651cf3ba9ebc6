//! The game: assets, world and the per-frame loop

use macroquad::prelude::*;

use crate::animation::AnimationFactory;
use crate::config::GameConfig;
use crate::entity::service::CameraRequest;
use crate::entity::{EntityFactory, EntityManager, EntityService};
use crate::error::{GameError, Result};
use crate::game::{LayerType, Tilemap};
use crate::input::InputHandler;
use crate::message::{Message, MessageBus, MessageType};
use crate::render::{Camera, ScreenTarget, SheetManager, SheetManifest, TextureStore};
use crate::util::{asset_path, relative_to};

/// Bus name of the game loop itself
pub const GAME_SUBSCRIBER: &str = "game";

/// Upper bound on pump rounds per routing pass, in case handlers keep
/// producing messages for each other
const MAX_ROUTING_ROUNDS: usize = 8;

pub fn window_conf() -> Conf {
    let config = GameConfig::load();
    Conf {
        window_title: config.window_title,
        window_width: config.window_width,
        window_height: config.window_height,
        high_dpi: false,
        ..Default::default()
    }
}

pub struct Game {
    config: GameConfig,
    textures: TextureStore,
    map: Tilemap,
    entities: EntityManager,
    bus: MessageBus,
    input: InputHandler,
    camera: Camera,
    game_over: bool,
    quit: bool,
}

impl Game {
    /// Load sheets, the tile map and its tilesets, then populate the world
    pub async fn load(config: GameConfig) -> Result<Self> {
        let manifest_text = load_text(&config.sheets_path).await?;
        let manifest = SheetManifest::from_toml(&manifest_text)?;
        let mut sheets = SheetManager::new();
        let mut textures = TextureStore::load(&manifest, &mut sheets).await;

        let map = Tilemap::from_json(&load_text(&config.map_path).await?)?;
        for tileset in &map.tilesets {
            let path = relative_to(&config.map_path, &tileset.image);
            if let Err(e) = textures.load_one(tileset.sheet_id(), &path).await {
                log::warn!("Tileset '{}': {}", tileset.name, e);
            }
        }

        Ok(Self::new(config, sheets, textures, map))
    }

    /// Assemble a game from already loaded parts and spawn the map's entities
    pub fn new(config: GameConfig, sheets: SheetManager, textures: TextureStore, map: Tilemap) -> Self {
        let animations = AnimationFactory::new(sheets, config.switch_time);
        let mut service = EntityService::new(animations, config.std_velocity);
        service.set_map_rect(map.rect());

        let mut entities = EntityManager::new(EntityFactory::with_default_kinds(), service);
        for data in &map.entities {
            if let Err(e) = entities.create_entity(data.clone()) {
                log::error!("Skipping map entity '{}': {}", data.type_name, e);
            }
        }

        let mut bus = MessageBus::new();
        bus.add_subscriber(GAME_SUBSCRIBER, &[MessageType::GameOver, MessageType::CloseWindow]);

        let mut camera = Camera::new(config.zoom);
        camera.center = map.rect().center();

        Self {
            config,
            textures,
            map,
            entities,
            bus,
            input: InputHandler::new(),
            camera,
            game_over: false,
            quit: false,
        }
    }

    pub fn entities(&self) -> &EntityManager {
        &self.entities
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub async fn run(mut self) {
        loop {
            let delta = get_frame_time();
            let input = self.input.process();
            self.step(delta, input, vec2(screen_width(), screen_height()));
            if self.quit {
                log::info!("Quitting");
                break;
            }

            self.draw();
            next_frame().await;
        }
    }

    /// Advance the world by one frame: route input, update entities, move the camera
    pub fn step(&mut self, delta: f32, input: Vec<Message>, screen: Vec2) {
        for message in input {
            if message == Message::KeyPressed(KeyCode::Escape) {
                self.bus.send(Message::CloseWindow);
            }
            self.bus.send(message);
        }
        self.route_messages();

        self.entities.update(delta, &mut self.bus);
        // Messages raised during the update (e.g. game over)
        self.route_messages();

        self.update_camera(screen);
    }

    fn route_messages(&mut self) {
        for _ in 0..MAX_ROUTING_ROUNDS {
            let deliveries = self.bus.pump();
            if deliveries.is_empty() {
                return;
            }
            for (subscriber, message) in deliveries {
                if subscriber == GAME_SUBSCRIBER {
                    self.on_message(&message);
                } else {
                    self.entities.handle_message(&subscriber, &message);
                }
            }
        }
        if self.bus.has_pending() {
            log::warn!("Messages still pending after {} routing rounds", MAX_ROUTING_ROUNDS);
        }
    }

    fn on_message(&mut self, message: &Message) {
        match message {
            Message::GameOver => {
                if !self.game_over {
                    log::info!("Game over");
                }
                self.game_over = true;
            }
            Message::CloseWindow => self.quit = true,
            _ => {}
        }
    }

    fn update_camera(&mut self, screen: Vec2) {
        let target = match self.entities.service().camera_request() {
            Some(CameraRequest::Track(id)) => match self.entities.get(id) {
                Some(entity) => entity.position(),
                None => self.camera.center,
            },
            Some(CameraRequest::Fix(position)) => position,
            None => self.camera.center,
        };
        self.camera.follow(target, self.map.rect(), screen);
    }

    pub fn draw(&self) {
        clear_background(Color::from_rgba(30, 30, 40, 255));

        let screen = vec2(screen_width(), screen_height());
        let view = self.camera.view_rect(screen);
        let mut target = ScreenTarget::new(&self.textures, &self.camera, self.config.debug_colliders);
        for layer in LayerType::ALL {
            self.map.draw_layer(&mut target, layer, Some(view));
            self.entities.draw_to(&mut target, layer, Some(view));
        }

        if self.game_over {
            draw_game_over(screen);
        }
    }
}

fn draw_game_over(screen: Vec2) {
    draw_rectangle(0.0, 0.0, screen.x, screen.y, Color::from_rgba(0, 0, 0, 160));

    let title = "GAME OVER";
    let hint = "Press Escape to quit";
    let title_size = measure_text(title, None, 48, 1.0);
    let hint_size = measure_text(hint, None, 20, 1.0);
    draw_text(title, (screen.x - title_size.width) / 2.0, screen.y / 2.0, 48.0, WHITE);
    draw_text(hint, (screen.x - hint_size.width) / 2.0, screen.y / 2.0 + 36.0, 20.0, LIGHTGRAY);
}

async fn load_text(path: &str) -> Result<String> {
    macroquad::file::load_string(&asset_path(path))
        .await
        .map_err(|e| GameError::Asset(format!("Failed to load '{}': {:?}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityType, StateType};
    use crate::entity::kinds::test_sheets;

    const MAP: &str = r#"{
        "width": 40, "height": 30, "tilewidth": 16, "tileheight": 16,
        "orientation": "orthogonal",
        "layers": [
            { "name": "Entities", "type": "objectgroup",
              "objects": [
                { "id": 1, "x": 200, "y": 200, "type": "Player",
                  "properties": [ { "name": "FaceDirection", "type": "string", "value": "Up" } ] },
                { "id": 2, "x": 400, "y": 300, "type": "Mole" },
                { "id": 3, "x": 96, "y": 96, "width": 16, "height": 16, "gid": 1, "type": "Coin" },
                { "id": 4, "x": 10, "y": 10, "type": "Dragon" }
              ] }
        ]
    }"#;

    const SCREEN: Vec2 = Vec2::new(320.0, 240.0);

    fn game() -> Game {
        let config = GameConfig {
            zoom: 1.0,
            std_velocity: 100.0,
            ..Default::default()
        };
        Game::new(config, test_sheets(), TextureStore::new(), Tilemap::from_json(MAP).unwrap())
    }

    fn player_id(game: &Game) -> u32 {
        game.entities()
            .iter()
            .find(|e| e.entity_type() == EntityType::Player)
            .map(|e| e.id())
            .unwrap()
    }

    #[test]
    fn test_map_entities_spawned() {
        let mut game = game();
        game.step(0.016, Vec::new(), SCREEN);
        assert_eq!(game.entities().len(), 3);
        assert!(game.entities().iter().all(|e| e.is_initialized()));
    }

    #[test]
    fn test_camera_tracks_player() {
        let mut game = game();
        game.step(0.016, Vec::new(), SCREEN);
        assert_eq!(game.camera().center, vec2(200.0, 200.0));

        let id = player_id(&game);
        game.step(0.5, vec![Message::IsKeyPressed(KeyCode::Right)], SCREEN);
        assert_eq!(game.entities().get(id).unwrap().current_state(), StateType::Move);
        assert_eq!(game.camera().center, vec2(250.0, 200.0));
    }

    #[test]
    fn test_game_over_after_player_death() {
        let mut game = game();
        game.step(0.016, Vec::new(), SCREEN);
        let id = player_id(&game);

        game.step(0.016, vec![Message::KeyPressed(KeyCode::Key1)], SCREEN);
        assert!(game.entities().get(id).is_none());
        assert!(game.is_game_over());
        assert!(!game.should_quit());
    }

    #[test]
    fn test_escape_quits() {
        let mut game = game();
        game.step(0.016, vec![Message::KeyPressed(KeyCode::Escape)], SCREEN);
        assert!(game.should_quit());
    }
}

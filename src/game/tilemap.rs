use macroquad::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;

use crate::entity::EntityData;
use crate::error::{GameError, Result};
use crate::render::{Image, RenderTarget, SheetId};

/// Tiled stores flip flags in the top bits of each gid
const GID_MASK: u32 = 0x1FFF_FFFF;

/// Tiled JSON tilemap format (simplified for orthogonal maps)
#[derive(Debug, Deserialize)]
pub struct TiledMap {
    pub width: u32,
    pub height: u32,
    pub tilewidth: u32,
    pub tileheight: u32,
    #[serde(default)]
    pub orientation: String,
    pub layers: Vec<TiledLayer>,
    #[serde(default)]
    pub tilesets: Vec<TiledTileset>,
}

#[derive(Debug, Deserialize)]
pub struct TiledLayer {
    pub name: String,
    #[serde(default)]
    pub data: Vec<u32>,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(rename = "type")]
    pub layer_type: String,
    #[serde(default)]
    pub objects: Vec<TiledObject>,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct TiledObject {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    /// Tile objects are anchored at their bottom-left corner
    #[serde(default)]
    pub gid: Option<u32>,
    #[serde(rename = "type", alias = "class", default)]
    pub object_type: String,
    #[serde(default)]
    pub properties: Vec<TileProperty>,
}

#[derive(Debug, Deserialize)]
pub struct TiledTileset {
    pub firstgid: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tilewidth: u32,
    #[serde(default)]
    pub tileheight: u32,
    #[serde(default)]
    pub tilecount: u32,
    #[serde(default)]
    pub columns: u32,
    #[serde(default)]
    pub image: String,
    /// Set for external tilesets, which are not supported
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TileProperty {
    pub name: String,
    #[serde(rename = "type", default)]
    pub property_type: String,
    pub value: serde_json::Value,
}

impl TileProperty {
    /// Property value as the string form entity properties are parsed from
    pub fn value_string(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    Ground,
    Objects,
    Overhead,
}

impl LayerType {
    pub const ALL: [LayerType; 3] = [LayerType::Ground, LayerType::Objects, LayerType::Overhead];
}

pub struct TilemapLayer {
    pub name: String,
    pub tiles: Vec<u32>, // Tile gids (0 = empty)
    pub layer_type: LayerType,
    pub visible: bool,
}

/// Tileset resolved for drawing
#[derive(Debug, Clone)]
pub struct Tileset {
    pub first_gid: u32,
    pub name: String,
    pub columns: u32,
    pub tile_size: Vec2,
    /// Image path relative to the map file
    pub image: String,
}

impl Tileset {
    pub fn sheet_id(&self) -> SheetId {
        SheetId(format!("tileset:{}", self.name))
    }
}

/// Processed tilemap ready for rendering
pub struct Tilemap {
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub layers: Vec<TilemapLayer>,
    pub tilesets: Vec<Tileset>,
    /// Entities placed in the object groups, spawned at level load
    pub entities: Vec<EntityData>,
}

impl Tilemap {
    /// Load tilemap from Tiled JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let tiled: TiledMap =
            serde_json::from_str(json).map_err(|e| GameError::Map(format!("Failed to parse tilemap: {}", e)))?;

        if tiled.orientation != "orthogonal" {
            log::warn!("Tilemap orientation is '{}', expected 'orthogonal'", tiled.orientation);
        }
        if tiled.tilewidth == 0 || tiled.tileheight == 0 {
            return Err(GameError::Map("Tile size must be positive".to_string()));
        }

        let mut layers = Vec::new();
        let mut entities = Vec::new();

        for layer in &tiled.layers {
            match layer.layer_type.as_str() {
                "tilelayer" => {
                    let layer_type = match layer.name.to_lowercase().as_str() {
                        "ground" | "floor" | "terrain" => LayerType::Ground,
                        "overhead" | "roof" | "sky" => LayerType::Overhead,
                        _ => LayerType::Objects,
                    };

                    let expected = (tiled.width * tiled.height) as usize;
                    if layer.data.len() != expected {
                        log::warn!(
                            "Layer '{}' has {} tiles, expected {}",
                            layer.name,
                            layer.data.len(),
                            expected
                        );
                    }

                    layers.push(TilemapLayer {
                        name: layer.name.clone(),
                        tiles: layer.data.clone(),
                        layer_type,
                        visible: layer.visible,
                    });
                }
                "objectgroup" => {
                    for obj in &layer.objects {
                        if obj.object_type.is_empty() {
                            log::warn!("Object {} in '{}' has no type, skipping", obj.id, layer.name);
                            continue;
                        }
                        entities.push(object_to_entity(obj));
                    }
                }
                _ => {}
            }
        }

        let mut tilesets = Vec::new();
        for tileset in &tiled.tilesets {
            if tileset.source.is_some() || tileset.image.is_empty() {
                log::warn!("Tileset '{}' is external or has no image, skipping", tileset.name);
                continue;
            }
            tilesets.push(Tileset {
                first_gid: tileset.firstgid,
                name: tileset.name.clone(),
                columns: tileset.columns.max(1),
                tile_size: vec2(tileset.tilewidth as f32, tileset.tileheight as f32),
                image: tileset.image.clone(),
            });
        }
        tilesets.sort_by_key(|t| t.first_gid);

        log::info!(
            "Loaded {}x{} tilemap: {} layers, {} tilesets, {} entities",
            tiled.width,
            tiled.height,
            layers.len(),
            tilesets.len(),
            entities.len()
        );

        Ok(Self {
            width: tiled.width,
            height: tiled.height,
            tile_width: tiled.tilewidth,
            tile_height: tiled.tileheight,
            layers,
            tilesets,
            entities,
        })
    }

    /// Map bounds in world pixels
    pub fn rect(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            (self.width * self.tile_width) as f32,
            (self.height * self.tile_height) as f32,
        )
    }

    /// Get tile gid at position
    pub fn get_tile(&self, layer_idx: usize, x: u32, y: u32) -> u32 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        let Some(layer) = self.layers.get(layer_idx) else {
            return 0;
        };
        let idx = (y * self.width + x) as usize;
        layer.tiles.get(idx).copied().unwrap_or(0) & GID_MASK
    }

    /// Source image for a gid, from the tileset with the largest first gid not above it
    pub fn tile_image(&self, gid: u32) -> Option<Image> {
        let gid = gid & GID_MASK;
        if gid == 0 {
            return None;
        }
        let tileset = self.tilesets.iter().rev().find(|t| t.first_gid <= gid)?;
        let local = gid - tileset.first_gid;
        let col = local % tileset.columns;
        let row = local / tileset.columns;
        Some(Image {
            sheet: tileset.sheet_id(),
            source: Rect::new(
                col as f32 * tileset.tile_size.x,
                row as f32 * tileset.tile_size.y,
                tileset.tile_size.x,
                tileset.tile_size.y,
            ),
            mirror: false,
        })
    }

    /// Draw every visible layer of `layer_type`, skipping tiles outside `view`
    pub fn draw_layer(&self, target: &mut dyn RenderTarget, layer_type: LayerType, view: Option<Rect>) {
        let tile = vec2(self.tile_width as f32, self.tile_height as f32);
        for (idx, layer) in self.layers.iter().enumerate() {
            if layer.layer_type != layer_type || !layer.visible {
                continue;
            }
            for y in 0..self.height {
                for x in 0..self.width {
                    let top_left = vec2(x as f32, y as f32) * tile;
                    if let Some(view) = view {
                        if !view.overlaps(&Rect::new(top_left.x, top_left.y, tile.x, tile.y)) {
                            continue;
                        }
                    }
                    if let Some(image) = self.tile_image(self.get_tile(idx, x, y)) {
                        // Tiles taller than the grid are anchored at the bottom of their cell
                        let size = image.size();
                        let center = vec2(top_left.x + size.x / 2.0, top_left.y + tile.y - size.y / 2.0);
                        target.draw_image(&image, center, 0.0);
                    }
                }
            }
        }
    }
}

fn object_to_entity(obj: &TiledObject) -> EntityData {
    let top = if obj.gid.is_some() { obj.y - obj.height } else { obj.y };
    let properties: HashMap<String, String> = obj
        .properties
        .iter()
        .map(|p| (p.name.clone(), p.value_string()))
        .collect();

    EntityData {
        type_name: obj.object_type.clone(),
        position: vec2(obj.x + obj.width / 2.0, top + obj.height / 2.0),
        properties,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::target::RecordingTarget;

    const MAP: &str = r#"{
        "width": 3, "height": 2, "tilewidth": 16, "tileheight": 16,
        "orientation": "orthogonal",
        "layers": [
            { "name": "Ground", "type": "tilelayer", "width": 3, "height": 2, "visible": true,
              "data": [1, 2, 0, 5, 1, 2147483649] },
            { "name": "Entities", "type": "objectgroup",
              "objects": [
                { "id": 1, "name": "", "x": 8, "y": 8, "width": 16, "height": 16, "type": "Player",
                  "properties": [ { "name": "FaceDirection", "type": "string", "value": "Left" } ] },
                { "id": 2, "x": 32, "y": 32, "width": 16, "height": 16, "gid": 3, "class": "Coin",
                  "properties": [ { "name": "Value", "type": "int", "value": 5 } ] },
                { "id": 3, "x": 0, "y": 0, "width": 4, "height": 4 }
              ] }
        ],
        "tilesets": [
            { "firstgid": 1, "name": "overworld", "tilewidth": 16, "tileheight": 16, "tilecount": 4,
              "columns": 2, "image": "overworld.png" },
            { "firstgid": 5, "name": "cave", "tilewidth": 16, "tileheight": 16, "tilecount": 4,
              "columns": 2, "image": "cave.png" }
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let map = Tilemap::from_json(MAP).unwrap();
        assert_eq!(map.rect(), Rect::new(0.0, 0.0, 48.0, 32.0));
        assert_eq!(map.layers.len(), 1);
        assert_eq!(map.layers[0].layer_type, LayerType::Ground);
        assert_eq!(map.tilesets.len(), 2);
    }

    #[test]
    fn test_objects_become_entities() {
        let map = Tilemap::from_json(MAP).unwrap();
        assert_eq!(map.entities.len(), 2);

        let player = &map.entities[0];
        assert_eq!(player.type_name, "Player");
        assert_eq!(player.position, vec2(16.0, 16.0));
        assert_eq!(player.properties.get("FaceDirection").map(String::as_str), Some("Left"));

        let coin = &map.entities[1];
        assert_eq!(coin.type_name, "Coin");
        assert_eq!(coin.position, vec2(40.0, 24.0));
        assert_eq!(coin.properties.get("Value").map(String::as_str), Some("5"));
    }

    #[test]
    fn test_tile_image_picks_tileset() {
        let map = Tilemap::from_json(MAP).unwrap();
        let image = map.tile_image(2).unwrap();
        assert_eq!(image.sheet, SheetId("tileset:overworld".to_string()));
        assert_eq!(image.source, Rect::new(16.0, 0.0, 16.0, 16.0));

        let image = map.tile_image(5).unwrap();
        assert_eq!(image.sheet, SheetId("tileset:cave".to_string()));
        assert_eq!(image.source, Rect::new(0.0, 0.0, 16.0, 16.0));

        assert!(map.tile_image(0).is_none());
    }

    #[test]
    fn test_get_tile_strips_flip_flags() {
        let map = Tilemap::from_json(MAP).unwrap();
        assert_eq!(map.get_tile(0, 2, 1), 1);
        assert_eq!(map.get_tile(0, 5, 5), 0);
        assert_eq!(map.get_tile(3, 0, 0), 0);
    }

    #[test]
    fn test_draw_layer() {
        let map = Tilemap::from_json(MAP).unwrap();
        let mut target = RecordingTarget::default();
        map.draw_layer(&mut target, LayerType::Ground, None);
        // Five non-empty tiles
        assert_eq!(target.images.len(), 5);
        assert_eq!(target.images[0].1, vec2(8.0, 8.0));

        let mut target = RecordingTarget::default();
        map.draw_layer(&mut target, LayerType::Ground, Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(target.images.len(), 1);

        let mut target = RecordingTarget::default();
        map.draw_layer(&mut target, LayerType::Overhead, None);
        assert!(target.images.is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(Tilemap::from_json("{"), Err(GameError::Map(_))));
    }

    #[test]
    fn test_shipped_map_loads() {
        let map = Tilemap::from_json(include_str!("../../assets/maps/meadow.json")).unwrap();
        assert_eq!(map.rect(), Rect::new(0.0, 0.0, 480.0, 320.0));
        assert_eq!(map.entities.iter().filter(|e| e.type_name == "Player").count(), 1);
        assert_eq!(map.entities.len(), 6);
        let entrance = map.entities.iter().find(|e| e.type_name == "Entrance").unwrap();
        assert_eq!(entrance.properties.get("ExitId").map(String::as_str), Some("1"));
        assert_eq!(map.layers.iter().filter(|l| l.layer_type == LayerType::Overhead).count(), 1);
    }
}

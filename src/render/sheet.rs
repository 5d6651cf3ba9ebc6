use macroquad::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{GameError, Result};
use crate::util::asset_path;

/// Identifier of a sprite sheet (e.g. "HeroWalkSide")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SheetId(pub String);

impl From<&str> for SheetId {
    fn from(id: &str) -> Self {
        SheetId(id.to_string())
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One cell of a sprite sheet, addressed by (column, row)
#[derive(Debug, Clone, PartialEq)]
pub struct SheetItem {
    pub sheet: SheetId,
    pub position: (u32, u32),
}

impl SheetItem {
    pub fn new(sheet: impl Into<SheetId>, col: u32, row: u32) -> Self {
        Self {
            sheet: sheet.into(),
            position: (col, row),
        }
    }
}

/// Descriptor of one animation frame
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub item: SheetItem,
    pub mirror: bool,
}

impl ImageData {
    pub fn new(sheet: impl Into<SheetId>, col: u32, row: u32) -> Self {
        Self {
            item: SheetItem::new(sheet, col, row),
            mirror: false,
        }
    }

    pub fn mirrored(mut self) -> Self {
        self.mirror = true;
        self
    }
}

/// Descriptor of one collider frame: a rectangle inside a sheet cell
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderData {
    pub item: SheetItem,
    pub rect: Rect,
}

impl ColliderData {
    pub fn new(item: SheetItem, rect: Rect) -> Self {
        Self { item, rect }
    }
}

/// Resolved frame: which sheet to sample, where, and whether to mirror it
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub sheet: SheetId,
    pub source: Rect,
    pub mirror: bool,
}

impl Image {
    pub fn size(&self) -> Vec2 {
        vec2(self.source.w, self.source.h)
    }
}

/// Sheet layout: a uniform grid of frames
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub columns: u32,
    pub rows: u32,
    pub frame_size: Vec2,
}

/// Entry of the sheet manifest (`assets/sheets.toml`)
#[derive(Debug, Clone, Deserialize)]
pub struct SheetEntry {
    pub id: String,
    pub path: String,
    pub columns: u32,
    pub rows: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct SheetManifest {
    #[serde(default)]
    pub sheets: Vec<SheetEntry>,
}

impl SheetManifest {
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Registry of sheet layouts, used to turn sheet cells into source rectangles
#[derive(Debug, Default)]
pub struct SheetManager {
    sheets: HashMap<SheetId, Sheet>,
}

impl SheetManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sheet from its full texture size and grid layout
    pub fn add_sheet(&mut self, id: SheetId, texture_size: Vec2, columns: u32, rows: u32) {
        let columns = columns.max(1);
        let rows = rows.max(1);
        let frame_size = vec2(texture_size.x / columns as f32, texture_size.y / rows as f32);
        if self.sheets.insert(id.clone(), Sheet { columns, rows, frame_size }).is_some() {
            log::warn!("Sheet {} registered twice, keeping the latest layout", id);
        }
    }

    pub fn get(&self, id: &SheetId) -> Option<&Sheet> {
        self.sheets.get(id)
    }

    pub fn frame_size(&self, id: &SheetId) -> Option<Vec2> {
        self.sheets.get(id).map(|s| s.frame_size)
    }

    /// Source rectangle of a sheet cell. Unknown sheets yield an empty rectangle.
    pub fn make_rect(&self, item: &SheetItem) -> Rect {
        let Some(sheet) = self.sheets.get(&item.sheet) else {
            log::error!("Unknown sheet {}", item.sheet);
            return Rect::new(0.0, 0.0, 0.0, 0.0);
        };

        let (col, row) = item.position;
        if col >= sheet.columns || row >= sheet.rows {
            log::warn!(
                "Sheet {} has {}x{} frames, ({}, {}) is out of range",
                item.sheet, sheet.columns, sheet.rows, col, row
            );
        }

        Rect::new(
            col as f32 * sheet.frame_size.x,
            row as f32 * sheet.frame_size.y,
            sheet.frame_size.x,
            sheet.frame_size.y,
        )
    }

    pub fn make_image(&self, data: &ImageData) -> Image {
        Image {
            sheet: data.item.sheet.clone(),
            source: self.make_rect(&data.item),
            mirror: data.mirror,
        }
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// GPU textures for every loaded sheet
pub struct TextureStore {
    textures: HashMap<SheetId, Texture2D>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
        }
    }

    /// Load every sheet in the manifest, registering its layout with `sheets`
    pub async fn load(manifest: &SheetManifest, sheets: &mut SheetManager) -> Self {
        let mut store = Self::new();

        for entry in &manifest.sheets {
            match load_texture(&asset_path(&entry.path)).await {
                Ok(texture) => {
                    texture.set_filter(FilterMode::Nearest);
                    let id = SheetId(entry.id.clone());
                    sheets.add_sheet(
                        id.clone(),
                        vec2(texture.width(), texture.height()),
                        entry.columns,
                        entry.rows,
                    );
                    store.textures.insert(id, texture);
                    log::debug!("Loaded sheet: {}", entry.id);
                }
                Err(e) => {
                    log::warn!("Failed to load sheet '{}' from '{}': {:?}", entry.id, entry.path, e);
                }
            }
        }

        log::info!("Loaded {} of {} sheets", store.textures.len(), manifest.sheets.len());
        store
    }

    /// Load a single texture under an explicit id (used for tilesets)
    pub async fn load_one(&mut self, id: SheetId, path: &str) -> Result<Texture2D> {
        let texture = load_texture(&asset_path(path))
            .await
            .map_err(|e| GameError::Asset(format!("Failed to load '{}': {:?}", path, e)))?;
        texture.set_filter(FilterMode::Nearest);
        self.textures.insert(id, texture.clone());
        Ok(texture)
    }

    pub fn get(&self, id: &SheetId) -> Option<&Texture2D> {
        self.textures.get(id)
    }
}

impl Default for TextureStore {
    fn default() -> Self {
        Self::new()
    }
}

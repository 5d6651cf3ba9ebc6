pub mod camera;
pub mod sheet;
pub mod target;

pub use camera::Camera;
pub use sheet::{
    ColliderData, Image, ImageData, Sheet, SheetId, SheetItem, SheetManager, SheetManifest, TextureStore,
};
pub use target::{RenderTarget, ScreenTarget};

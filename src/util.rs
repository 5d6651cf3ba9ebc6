//! Utility functions shared across the codebase

use std::path::Path;

/// Get the correct asset path for the current platform
/// On Android, assets are loaded from the APK root, so the "assets/" prefix is stripped
pub fn asset_path(path: &str) -> String {
    #[cfg(target_os = "android")]
    {
        if let Some(stripped) = path.strip_prefix("assets/") {
            stripped.to_string()
        } else {
            path.to_string()
        }
    }
    #[cfg(not(target_os = "android"))]
    {
        path.to_string()
    }
}

/// Resolve `path` relative to the directory containing `base_file`.
/// Tiled stores tileset images relative to the map file.
pub fn relative_to(base_file: &str, path: &str) -> String {
    match Path::new(base_file).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(path).to_string_lossy().replace('\\', "/"),
        _ => path.to_string(),
    }
}

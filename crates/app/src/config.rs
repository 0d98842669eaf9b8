use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Fonts tried when no font is configured, after `<assets>/fonts/`.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Font files looked for under `<assets>/fonts/`.
const BUNDLED_FONTS: &[&str] = &["Roboto-Regular.ttf", "DejaVuSans.ttf"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("window size must be non-zero, got {width}x{height}")]
    ZeroSize { width: u32, height: u32 },
}

/// Window and resource settings for an [`crate::App`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSpecification {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Root for relative texture paths and bundled fonts.
    pub assets_dir: PathBuf,
    /// Font for text rendering. Searched for when unset.
    pub font_path: Option<PathBuf>,
    /// Directory of `quad.wgsl`/`circle.wgsl`/`text.wgsl` overrides.
    pub shader_dir: Option<PathBuf>,
    pub vsync: bool,
}

impl Default for AppSpecification {
    fn default() -> Self {
        Self {
            title: "Mamba".into(),
            width: 800,
            height: 600,
            assets_dir: PathBuf::from("assets"),
            font_path: None,
            shader_dir: None,
            vsync: true,
        }
    }
}

/// Config file contents. Every field is optional and overrides the
/// application's own defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SpecFile {
    title: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    assets_dir: Option<PathBuf>,
    font_path: Option<PathBuf>,
    shader_dir: Option<PathBuf>,
    vsync: Option<bool>,
}

impl AppSpecification {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            ..Self::default()
        }
    }

    /// Overlay the fields present in a JSON config string.
    pub fn merge_json(mut self, json: &str, path: &Path) -> Result<Self, ConfigError> {
        let file: SpecFile = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(title) = file.title {
            self.title = title;
        }
        if let Some(width) = file.width {
            self.width = width;
        }
        if let Some(height) = file.height {
            self.height = height;
        }
        if let Some(dir) = file.assets_dir {
            self.assets_dir = dir;
        }
        if file.font_path.is_some() {
            self.font_path = file.font_path;
        }
        if file.shader_dir.is_some() {
            self.shader_dir = file.shader_dir;
        }
        if let Some(vsync) = file.vsync {
            self.vsync = vsync;
        }
        Ok(self)
    }

    /// Overlay the fields present in the JSON config file at `path`.
    pub fn merge_file(self, path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.merge_json(&json, path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Resolve `path` against the assets directory unless it is absolute.
    pub fn asset_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.assets_dir.join(path)
        }
    }

    /// The configured font, else the first bundled or system font that exists.
    pub fn resolve_font(&self) -> Option<PathBuf> {
        if let Some(path) = &self.font_path {
            return Some(path.clone());
        }
        let fonts = self.assets_dir.join("fonts");
        BUNDLED_FONTS
            .iter()
            .map(|name| fonts.join(name))
            .chain(SYSTEM_FONTS.iter().map(PathBuf::from))
            .find(|p| p.is_file())
    }
}

/// Command line flags shared by every Mamba binary.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct AppArgs {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Window width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Assets directory
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// TrueType font used for text
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Directory with WGSL shader overrides
    #[arg(long)]
    pub shaders: Option<PathBuf>,

    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl AppArgs {
    /// `defaults`, then the config file, then flags.
    pub fn specification(&self, defaults: AppSpecification) -> Result<AppSpecification, ConfigError> {
        let mut spec = match &self.config {
            Some(path) => defaults.merge_file(path)?,
            None => defaults,
        };
        if let Some(width) = self.width {
            spec.width = width;
        }
        if let Some(height) = self.height {
            spec.height = height;
        }
        if let Some(dir) = &self.assets {
            spec.assets_dir = dir.clone();
        }
        if let Some(font) = &self.font {
            spec.font_path = Some(font.clone());
        }
        if let Some(dir) = &self.shaders {
            spec.shader_dir = Some(dir.clone());
        }
        spec.validate()?;
        Ok(spec)
    }

    /// Install the global tracing subscriber.
    pub fn init_logging(&self) {
        let filter = if self.verbose { "debug" } else { "info" };
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_app_defaults() {
        let base = AppSpecification::new("Breakout", 800, 600);
        let spec = base
            .merge_json(r#"{ "height": 720, "vsync": false }"#, Path::new("app.json"))
            .unwrap();
        assert_eq!(spec.title, "Breakout");
        assert_eq!((spec.width, spec.height), (800, 720));
        assert!(!spec.vsync);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = AppSpecification::default()
            .merge_json(r#"{ "widht": 10 }"#, Path::new("app.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("app.json"));
    }

    #[test]
    fn flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.json");
        std::fs::write(&path, r#"{ "width": 1024, "title": "From file" }"#).unwrap();

        let args = AppArgs {
            width: Some(640),
            font: Some(PathBuf::from("my.ttf")),
            config: Some(path),
            ..AppArgs::default()
        };
        let spec = args.specification(AppSpecification::default()).unwrap();
        assert_eq!(spec.title, "From file");
        assert_eq!(spec.width, 640);
        assert_eq!(spec.font_path, Some(PathBuf::from("my.ttf")));
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = AppArgs {
            config: Some(dir.path().join("absent.json")),
            ..AppArgs::default()
        };
        let err = args.specification(AppSpecification::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn zero_size_is_rejected() {
        let args = AppArgs {
            height: Some(0),
            ..AppArgs::default()
        };
        let err = args.specification(AppSpecification::default()).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroSize { height: 0, .. }));
    }

    #[test]
    fn asset_paths() {
        let spec = AppSpecification {
            assets_dir: PathBuf::from("data"),
            ..AppSpecification::default()
        };
        assert_eq!(
            spec.asset_path("textures/button.png"),
            PathBuf::from("data/textures/button.png")
        );
        let abs = std::env::temp_dir().join("x.png");
        assert_eq!(spec.asset_path(&abs), abs);
    }

    #[test]
    fn font_resolution_prefers_configured_then_bundled() {
        let dir = tempfile::tempdir().unwrap();
        let fonts = dir.path().join("fonts");
        std::fs::create_dir(&fonts).unwrap();
        std::fs::write(fonts.join("Roboto-Regular.ttf"), b"").unwrap();

        let mut spec = AppSpecification {
            assets_dir: dir.path().to_path_buf(),
            ..AppSpecification::default()
        };
        assert_eq!(spec.resolve_font(), Some(fonts.join("Roboto-Regular.ttf")));

        spec.font_path = Some(PathBuf::from("custom.ttf"));
        assert_eq!(spec.resolve_font(), Some(PathBuf::from("custom.ttf")));
    }
}

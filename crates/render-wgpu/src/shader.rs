use crate::shaders;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read shader {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{kind} shader failed to compile: {message}")]
    Compile { kind: &'static str, message: String },
}

/// The three render stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Quad,
    Circle,
    Text,
}

impl ShaderKind {
    pub const ALL: [ShaderKind; 3] = [Self::Quad, Self::Circle, Self::Text];

    pub fn name(self) -> &'static str {
        match self {
            Self::Quad => "quad",
            Self::Circle => "circle",
            Self::Text => "text",
        }
    }

    /// File looked up in a shader override directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Quad => "quad.wgsl",
            Self::Circle => "circle.wgsl",
            Self::Text => "text.wgsl",
        }
    }

    pub fn builtin(self) -> &'static str {
        match self {
            Self::Quad => shaders::QUAD_SHADER,
            Self::Circle => shaders::CIRCLE_SHADER,
            Self::Text => shaders::TEXT_SHADER,
        }
    }
}

/// Read `dir/<kind>.wgsl`. `Ok(None)` if the file does not exist.
pub fn read_override(dir: &Path, kind: ShaderKind) -> Result<Option<String>, ShaderError> {
    let path = dir.join(kind.file_name());
    match std::fs::read_to_string(&path) {
        Ok(src) => Ok(Some(src)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ShaderError::Io { path, source }),
    }
}

/// WGSL source for each stage, read once at startup.
#[derive(Debug, Clone)]
pub struct ShaderSources {
    quad: Cow<'static, str>,
    circle: Cow<'static, str>,
    text: Cow<'static, str>,
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ShaderSources {
    pub fn builtin() -> Self {
        Self {
            quad: Cow::Borrowed(shaders::QUAD_SHADER),
            circle: Cow::Borrowed(shaders::CIRCLE_SHADER),
            text: Cow::Borrowed(shaders::TEXT_SHADER),
        }
    }

    /// Built-in sources, replaced by any `<kind>.wgsl` found in `dir`.
    /// Unreadable overrides are logged and skipped.
    pub fn load(dir: Option<&Path>) -> Self {
        let mut sources = Self::builtin();
        let Some(dir) = dir else {
            return sources;
        };
        for kind in ShaderKind::ALL {
            match read_override(dir, kind) {
                Ok(Some(src)) => {
                    tracing::info!("using {} shader from {}", kind.name(), dir.display());
                    *sources.slot(kind) = Cow::Owned(src);
                }
                Ok(None) => {}
                Err(e) => tracing::error!("{e}; using built-in {} shader", kind.name()),
            }
        }
        sources
    }

    pub fn get(&self, kind: ShaderKind) -> &str {
        self.source(kind)
    }

    pub fn is_builtin(&self, kind: ShaderKind) -> bool {
        matches!(self.source(kind), Cow::Borrowed(_))
    }

    fn source(&self, kind: ShaderKind) -> &Cow<'static, str> {
        match kind {
            ShaderKind::Quad => &self.quad,
            ShaderKind::Circle => &self.circle,
            ShaderKind::Text => &self.text,
        }
    }

    fn slot(&mut self, kind: ShaderKind) -> &mut Cow<'static, str> {
        match kind {
            ShaderKind::Quad => &mut self.quad,
            ShaderKind::Circle => &mut self.circle,
            ShaderKind::Text => &mut self.text,
        }
    }
}

/// A compiled shader module. Released when dropped.
pub struct Shader {
    kind: ShaderKind,
    module: wgpu::ShaderModule,
}

impl Shader {
    /// Compile `source`, capturing validation errors instead of letting them
    /// reach the device's uncaptured error handler.
    pub fn compile(
        device: &wgpu::Device,
        kind: ShaderKind,
        source: &str,
    ) -> Result<Self, ShaderError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(kind.name()),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        match pollster::block_on(device.pop_error_scope()) {
            None => Ok(Self { kind, module }),
            Some(e) => Err(ShaderError::Compile {
                kind: kind.name(),
                message: e.to_string(),
            }),
        }
    }

    /// Compile the configured source, falling back to the built-in one.
    pub fn compile_or_builtin(
        device: &wgpu::Device,
        kind: ShaderKind,
        sources: &ShaderSources,
    ) -> Self {
        if !sources.is_builtin(kind) {
            match Self::compile(device, kind, sources.get(kind)) {
                Ok(shader) => return shader,
                Err(e) => tracing::error!("{e}; using built-in {} shader", kind.name()),
            }
        }
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(kind.name()),
            source: wgpu::ShaderSource::Wgsl(kind.builtin().into()),
        });
        Self { kind, module }
    }

    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    pub fn module(&self) -> &wgpu::ShaderModule {
        &self.module
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_override_dir_means_builtin() {
        let sources = ShaderSources::load(None);
        for kind in ShaderKind::ALL {
            assert!(sources.is_builtin(kind));
            assert_eq!(sources.get(kind), kind.builtin());
        }
    }

    #[test]
    fn override_replaces_only_present_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("circle.wgsl"), "// custom circle").unwrap();

        let sources = ShaderSources::load(Some(dir.path()));
        assert_eq!(sources.get(ShaderKind::Circle), "// custom circle");
        assert!(!sources.is_builtin(ShaderKind::Circle));
        assert!(sources.is_builtin(ShaderKind::Quad));
        assert!(sources.is_builtin(ShaderKind::Text));
    }

    #[test]
    fn missing_override_dir_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(read_override(&missing, ShaderKind::Quad).unwrap().is_none());
        assert!(ShaderSources::load(Some(&missing)).is_builtin(ShaderKind::Quad));
    }

    #[test]
    fn unreadable_override_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where a file is expected cannot be read as text.
        std::fs::create_dir(dir.path().join("text.wgsl")).unwrap();
        let err = read_override(dir.path(), ShaderKind::Text).unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
        assert!(ShaderSources::load(Some(dir.path())).is_builtin(ShaderKind::Text));
    }
}

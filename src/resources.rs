//==================================================
// File: resources.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Locate Cub standard library module sources
// Objective: Resolve module names to source text behind one provider trait
//==================================================

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Default file extension of Cub source modules.
pub const SOURCE_EXTENSION: &str = "cub";

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("stdlib module '{module}' could not be located")]
    NotFound { module: String },
    #[error("failed reading stdlib module '{}': {error}", path.display())]
    Io { path: PathBuf, error: io::Error },
}

/// Resolves a module name to its source text.
pub trait ResourceProvider {
    fn resolve(&self, module: &str) -> Result<String, ResourceError>;
}

impl<P: ResourceProvider + ?Sized> ResourceProvider for &P {
    fn resolve(&self, module: &str) -> Result<String, ResourceError> {
        (**self).resolve(module)
    }
}

impl<P: ResourceProvider + ?Sized> ResourceProvider for Box<P> {
    fn resolve(&self, module: &str) -> Result<String, ResourceError> {
        (**self).resolve(module)
    }
}

//==================================================
// Section 1.0 - Directory provider
//==================================================

/// Where a deployment keeps its module sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRoot {
    /// Resource directory shipped alongside a packaged host.
    Bundled(PathBuf),
    /// The `stdlib/` directory of this crate's source tree.
    SourceTree,
}

impl ResourceRoot {
    pub fn path(&self) -> PathBuf {
        match self {
            ResourceRoot::Bundled(path) => path.clone(),
            ResourceRoot::SourceTree => PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("stdlib"),
        }
    }
}

/// Reads `<root>/<Module>.<extension>` from disk.
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
    extension: String,
}

impl DirectoryProvider {
    pub fn new(root: ResourceRoot) -> Self {
        Self {
            root: root.path(),
            extension: SOURCE_EXTENSION.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn module_path(&self, module: &str) -> PathBuf {
        self.root.join(format!("{module}.{}", self.extension))
    }
}

impl ResourceProvider for DirectoryProvider {
    fn resolve(&self, module: &str) -> Result<String, ResourceError> {
        let path = self.module_path(module);
        debug!(module, path = %path.display(), "reading stdlib module");
        fs::read_to_string(&path).map_err(|error| match error.kind() {
            io::ErrorKind::NotFound => ResourceError::NotFound {
                module: module.to_string(),
            },
            _ => ResourceError::Io { path, error },
        })
    }
}

//==================================================
// Section 2.0 - In-memory providers
//==================================================

/// Module sources held in memory, for hosts that ship sources themselves.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    modules: HashMap<String, String>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, name: &str, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }

    pub fn insert(&mut self, name: &str, source: impl Into<String>) {
        self.modules.insert(name.to_string(), source.into());
    }
}

impl ResourceProvider for MemoryProvider {
    fn resolve(&self, module: &str) -> Result<String, ResourceError> {
        self.modules
            .get(module)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound {
                module: module.to_string(),
            })
    }
}

/// The crate's bundled stdlib sources compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedProvider;

const EMBEDDED: &[(&str, &str)] = &[
    ("Arithmetic", include_str!("../stdlib/Arithmetic.cub")),
    ("Graphics", include_str!("../stdlib/Graphics.cub")),
];

impl ResourceProvider for EmbeddedProvider {
    fn resolve(&self, module: &str) -> Result<String, ResourceError> {
        EMBEDDED
            .iter()
            .find(|(name, _)| *name == module)
            .map(|(_, source)| source.to_string())
            .ok_or_else(|| ResourceError::NotFound {
                module: module.to_string(),
            })
    }
}

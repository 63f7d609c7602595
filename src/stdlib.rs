//==================================================
// File: stdlib.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Bootstrap the Cub standard library prologue
// Objective: Concatenate the ordered stdlib modules into one source blob
//==================================================

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::resources::{ResourceError, ResourceProvider};

/// Stdlib modules in load order. Later modules use definitions from earlier
/// ones, so the order is part of the contract.
pub const DEFAULT_MODULES: &[&str] = &["Arithmetic", "Graphics"];

#[derive(Debug, Error)]
pub enum StdLibError {
    #[error("stdlib resource '{module}' not found")]
    ResourceNotFound { module: String },
    #[error(transparent)]
    Resource(ResourceError),
    #[error("stdlib assembler already ran (state: {state:?}); start a new bootstrap")]
    AlreadyRun { state: AssemblerState },
}

impl From<ResourceError> for StdLibError {
    fn from(error: ResourceError) -> Self {
        match error {
            ResourceError::NotFound { module } => StdLibError::ResourceNotFound { module },
            other => StdLibError::Resource(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    Idle,
    Loading,
    Assembled,
    Failed,
}

/// One module's source, alive only while the assembler runs.
#[derive(Debug)]
struct StdLibModule {
    name: String,
    source_text: String,
}

//==================================================
// Section 1.0 - Assembler
//==================================================

/// One-shot assembler. A failed or finished assembler cannot be rerun; a new
/// bootstrap attempt builds a new assembler.
#[derive(Debug)]
pub struct StdLibAssembler<P> {
    provider: P,
    modules: Vec<String>,
    state: AssemblerState,
}

impl<P: ResourceProvider> StdLibAssembler<P> {
    pub fn new(provider: P) -> Self {
        Self::with_modules(provider, DEFAULT_MODULES.iter().map(|m| m.to_string()).collect())
    }

    pub fn with_modules(provider: P, modules: Vec<String>) -> Self {
        Self {
            provider,
            modules,
            state: AssemblerState::Idle,
        }
    }

    pub fn state(&self) -> AssemblerState {
        self.state
    }

    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    #[instrument(skip(self))]
    pub fn assemble(&mut self) -> Result<String, StdLibError> {
        if self.state != AssemblerState::Idle {
            return Err(StdLibError::AlreadyRun { state: self.state });
        }
        self.state = AssemblerState::Loading;

        let mut stdlib = String::new();
        for name in &self.modules {
            let module = match load_module(&self.provider, name) {
                Ok(module) => module,
                Err(error) => {
                    warn!(module = %name, %error, "stdlib bootstrap failed");
                    self.state = AssemblerState::Failed;
                    return Err(error);
                }
            };
            debug!(module = %module.name, bytes = module.source_text.len(), "stdlib module loaded");
            stdlib.push_str(&module.source_text);
        }

        self.state = AssemblerState::Assembled;
        info!(modules = self.modules.len(), bytes = stdlib.len(), "stdlib assembled");
        Ok(stdlib)
    }
}

fn load_module<P: ResourceProvider>(provider: &P, name: &str) -> Result<StdLibModule, StdLibError> {
    let source_text = provider.resolve(name)?;
    Ok(StdLibModule {
        name: name.to_string(),
        source_text,
    })
}

/// Assembles the default module list with a fresh assembler.
pub fn stdlib_code<P: ResourceProvider>(provider: P) -> Result<String, StdLibError> {
    StdLibAssembler::new(provider).assemble()
}

/// Source handed to the compiler: the stdlib prologue followed by user code.
pub fn with_prologue(stdlib: &str, user_source: &str) -> String {
    let mut source = String::with_capacity(stdlib.len() + user_source.len());
    source.push_str(stdlib);
    source.push_str(user_source);
    source
}

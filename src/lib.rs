//==================================================
// File: lib.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Embedding boundary of the Cub scripting language
// Objective: Expose host builtins to scripts and assemble the stdlib prologue
//==================================================

//! Host side of the Cub interpreter boundary.
//!
//! * [`Value`] and [`ArgumentBinding`] are the data exchanged with scripts.
//! * [`FunctionRegistry`] is the registration contract; [`HostRegistry`] is an
//!   in-process dispatcher implementing it.
//! * [`Completion`] / [`PendingCall`] deliver exactly one result per call.
//! * [`StdLibAssembler`] concatenates the stdlib modules into the prologue.
//! * [`register_builtins`] installs the builtin function set.

pub mod binding;
pub mod builtins;
pub mod capabilities;
pub mod completion;
pub mod config;
pub mod logging;
pub mod registry;
pub mod resources;
pub mod stdlib;
pub mod value;

pub use binding::ArgumentBinding;
pub use builtins::{BuiltinOptions, Calendar, register_builtins};
pub use capabilities::{Capabilities, FormatCapability, RandomCapability, UniformSource};
pub use completion::{CallError, Completion, PendingCall};
pub use config::{ConfigError, EmbedConfig};
pub use registry::{FunctionDescriptor, FunctionRegistry, HostRegistry, RegistryError};
pub use resources::{
    DirectoryProvider, EmbeddedProvider, MemoryProvider, ResourceError, ResourceProvider,
    ResourceRoot,
};
pub use stdlib::{AssemblerState, StdLibAssembler, StdLibError};
pub use value::Value;

/// Runs the bootstrap: assembles the stdlib prologue, then registers the
/// builtins. Nothing is registered when assembly fails.
pub fn bootstrap<R, P>(
    registry: &mut R,
    provider: P,
    config: &EmbedConfig,
) -> Result<String, StdLibError>
where
    R: FunctionRegistry + ?Sized,
    P: ResourceProvider,
{
    let prologue = StdLibAssembler::with_modules(provider, config.stdlib.modules.clone()).assemble()?;
    let options = BuiltinOptions::new(config.calendar(), config.capabilities());
    let count = register_builtins(registry, &options);
    tracing::info!(builtins = count, "cub embedding ready");
    Ok(prologue)
}

//==================================================
// File: logging.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Tracing setup for host processes
//==================================================

use std::sync::OnceLock;

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

static INIT: OnceLock<()> = OnceLock::new();

/// Installs the global subscriber once. `RUST_LOG` refines the filter;
/// `verbose` raises the floor to debug.
pub fn init(component: &str, verbose: bool) {
    INIT.get_or_init(|| {
        let level = if verbose { Level::DEBUG } else { Level::INFO };
        let installed = SubscriberBuilder::default()
            .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
            .with_target(true)
            .with_writer(std::io::stderr)
            .compact()
            .try_init();
        if let Err(err) = installed {
            // The embedding host owns the global subscriber; keep it.
            tracing::debug!(component, error = %err, "global subscriber already installed");
        }
    });
    tracing::debug!(component, "tracing initialised");
}

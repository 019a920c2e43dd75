//! Backend configuration fixed at adapter construction.

use camino::Utf8PathBuf;
use serde::Deserialize;

/// Immutable adapter configuration.
///
/// This is the whole of an adapter's state: once constructed from it, an
/// adapter never mutates anything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendConfig {
    /// Scheduler installation root. Empty means the tools are resolved
    /// through the default search path.
    #[serde(default)]
    pub install_root: Utf8PathBuf,

    /// Cluster identifier, exported to the tools' environment.
    #[serde(default)]
    pub cluster: Option<String>,
}

//! Configuration types deserialized from `aion.toml`.

use serde::Deserialize;

/// Default for [`CoverageConfig::max_width`].
pub const DEFAULT_MAX_TOGGLE_WIDTH: u32 = 256;

/// The top-level project configuration parsed from `aion.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata.
    pub project: ProjectMeta,
    /// Coverage instrumentation settings.
    #[serde(default)]
    pub coverage: CoverageConfig,
}

/// Core project metadata required in every `aion.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    pub version: String,
    /// Name of the top-level module.
    pub top: String,
}

/// Which coverage categories to instrument, and the limits that apply.
///
/// Read-only during instrumentation: the pass queries these flags but never
/// changes them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    /// Line coverage: procedure blocks, if/else branches, case arms.
    pub line: bool,
    /// Toggle coverage of module-level signals.
    pub toggle: bool,
    /// Explicit user `cover` blocks.
    pub user: bool,
    /// Create a traced 32-bit counter variable next to each line/user point.
    pub trace: bool,
    /// Upper bound on `width × unpacked elements` of a toggle-covered signal.
    pub max_width: u32,
    /// Also toggle-cover signals whose name has a component starting with `_`.
    pub underscore: bool,
}

impl CoverageConfig {
    /// Line, toggle and user coverage enabled, everything else at defaults.
    pub fn all() -> Self {
        Self {
            line: true,
            toggle: true,
            user: true,
            ..Self::default()
        }
    }

    /// Returns `true` if any coverage category is enabled.
    pub fn any_enabled(&self) -> bool {
        self.line || self.toggle || self.user
    }
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            line: false,
            toggle: false,
            user: false,
            trace: false,
            max_width: DEFAULT_MAX_TOGGLE_WIDTH,
            underscore: false,
        }
    }
}

//! Layered configuration.
//!
//! Tiers, lowest priority first:
//! 1. **Defaults** - compiled in
//! 2. **Project** - `$CWD/todo/config.yaml`
//! 3. **User** - `~/.todo/config.yaml`
//! 4. **Environment** - `TODO_DB_PATH`, `TODO_HOST`, `TODO_PORT`
//!
//! YAML tiers are merged field by field. `TODO_CONFIG_PATH` (or `--config`)
//! names one file that replaces the project and user tiers.
//! `TODO_PROJECT_DIR` and `TODO_USER_DIR` relocate those tiers.

mod loader;
mod merge;
mod types;

pub use loader::{ConfigLoader, ConfigPaths, ConfigTier};
pub use merge::{deep_merge, deep_merge_all};
pub use types::*;

//! Configuration.
//!
//! Layers, lowest precedence first:
//! 1. **Defaults** - compiled in (`Config::default()`)
//! 2. **File** - YAML at `$TASK_LIST_CONFIG_PATH`, else `./task-list.yaml` if present
//! 3. **Environment** - after loading `.env` when present
//! 4. **CLI** - flags applied by `main`
//!
//! ## Environment Variables
//! - `HOST` - Listen address (default `0.0.0.0`)
//! - `PORT` - Listen port (default `3000`)
//! - `PUBLIC_DIR` - Static asset directory (default `public`)
//! - `CORS` - Permissive CORS on the API (`true`/`false`)
//! - `DB_PATH` - SQLite database file (default `tasks.db`)
//! - `DB_POOL_SIZE` - Pooled connections (default `10`)

mod loader;
mod merge;
mod types;

pub use loader::{CONFIG_PATH_ENV, ConfigLoader, DEFAULT_CONFIG_FILE};
pub use merge::{deep_merge, deep_merge_all};
pub use types::*;

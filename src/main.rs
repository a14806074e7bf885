//! Binary entry point: resolve where the catalog lives, start file logging,
//! prepare the database and hand control to the Ratatui event loop.
use personal_library::{logging, run_app, App, Gateway, LibraryConfig};

/// Returning a `Result` surfaces fatal setup problems (no home directory, an
/// unwritable log folder) on the terminal instead of crashing silently. A
/// database that cannot be prepared is not fatal; the shell reports it.
fn main() -> anyhow::Result<()> {
    let config = LibraryConfig::resolve()?;
    let _guard = logging::init(&config.log_dir)?;
    tracing::info!(db = %config.db_path.display(), "starting personal library");

    let mut app = App::open(Gateway::new(&config.db_path));
    let result = run_app(&mut app);
    tracing::info!("personal library closed");
    result
}

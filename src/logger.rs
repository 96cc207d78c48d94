use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::Result;

/// Send tracing output to `path`, appending.  stdout belongs to the TUI.
///
/// `RUST_LOG` wins over `verbose` when set.
pub fn init_file_logger(path: &Path, verbose: bool) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let default_filter = if verbose {
        "note_feed=debug,info"
    } else {
        "note_feed=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();

    Ok(())
}

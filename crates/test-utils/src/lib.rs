pub mod builders;
pub mod recording;

use std::path::PathBuf;
use std::sync::{Arc, Once};

use scriptdag::engine::BuildContext;
use scriptdag::fs::mock::MockFileSystem;
use scriptdag::library::{LibraryNamespaces, LibraryRegistry, TaskCatalog};
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Run a future with a 5-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}

/// Build context over an in-memory filesystem rooted at `.`, with the
/// built-in libraries registered.
pub fn test_context(fs: &MockFileSystem) -> BuildContext {
    context_with(fs, &LibraryRegistry::with_builtins(), TaskCatalog::builtin())
}

/// Build context with an explicit registry and catalog.
pub fn context_with(
    fs: &MockFileSystem,
    registry: &LibraryRegistry,
    catalog: TaskCatalog,
) -> BuildContext {
    let namespaces = LibraryNamespaces::register(registry, Arc::new(catalog));
    BuildContext::new(PathBuf::from("."), Arc::new(namespaces), Arc::new(fs.clone()))
}

// tests/library_namespaces.rs

mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use scriptdag::fs::mock::MockFileSystem;
use scriptdag::library::{LibraryError, LibraryNamespaces, LibraryRegistry, TaskCatalog};
use scriptdag::types::Args;
use scriptdag_test_utils::context_with;
use scriptdag_test_utils::recording::{recording_library, CallLog};

type TestResult = Result<(), Box<dyn Error>>;

/// Catalog with one user library at `vendor/tools` that counts how often it
/// is constructed.
fn counting_catalog(log: &CallLog, loads: &Arc<AtomicUsize>) -> TaskCatalog {
    let mut catalog = TaskCatalog::builtin();
    let log = log.clone();
    let loads = Arc::clone(loads);
    catalog.register("vendor/tools", move || {
        loads.fetch_add(1, Ordering::SeqCst);
        Arc::new(recording_library("Tools", &log))
    });
    catalog
}

#[test]
fn namespaces_follow_registry_order_and_load_lazily() -> TestResult {
    init_tracing();

    let log = CallLog::new();
    let loads = Arc::new(AtomicUsize::new(0));
    let registry = LibraryRegistry::from_script("#antlib Tools vendor/tools\n");
    let namespaces = LibraryNamespaces::register(&registry, Arc::new(counting_catalog(&log, &loads)));

    assert_eq!(namespaces.symbols().collect::<Vec<_>>(), vec!["Core", "Deps", "Tools"]);
    assert!(!namespaces.is_loaded("Tools"));
    assert_eq!(loads.load(Ordering::SeqCst), 0);

    namespaces.resolve_task("Tools.record")?;
    namespaces.resolve_task("Tools.note")?;

    assert!(namespaces.is_loaded("Tools"));
    assert!(!namespaces.is_loaded("Deps"));
    assert_eq!(loads.load(Ordering::SeqCst), 1);

    Ok(())
}

#[test]
fn resolve_task_reports_each_failure_kind() -> TestResult {
    init_tracing();

    let registry = LibraryRegistry::from_script("#antlib Ghost nowhere/ghost\n");
    let namespaces = LibraryNamespaces::register(&registry, Arc::new(TaskCatalog::builtin()));

    assert_eq!(
        namespaces.resolve_task("noDot").err(),
        Some(LibraryError::BadReference("noDot".to_string()))
    );
    assert_eq!(
        namespaces.resolve_task("Missing.echo").err(),
        Some(LibraryError::UnknownNamespace("Missing".to_string()))
    );
    assert_eq!(
        namespaces.resolve_task("Ghost.run").err(),
        Some(LibraryError::ResourceNotFound {
            symbol: "Ghost".to_string(),
            resource: "nowhere/ghost".to_string(),
        })
    );
    assert_eq!(
        namespaces.resolve_task("Core.teleport").err(),
        Some(LibraryError::UnknownTask {
            symbol: "Core".to_string(),
            task: "teleport".to_string(),
        })
    );

    Ok(())
}

#[tokio::test]
async fn overridden_symbol_resolves_to_the_later_resource() -> TestResult {
    init_tracing();

    let log = CallLog::new();
    let mut catalog = TaskCatalog::builtin();
    {
        let log = log.clone();
        catalog.register("first", move || Arc::new(recording_library("First", &log)));
    }
    {
        let log = log.clone();
        catalog.register("second", move || Arc::new(recording_library("Second", &log)));
    }

    let registry = LibraryRegistry::from_script("#antlib X first\n#antlib X second\n");
    let fs = MockFileSystem::new();
    let mut ctx = context_with(&fs, &registry, catalog);

    let task = ctx.namespaces().resolve_task("X.record")?;
    task.run(&mut ctx, &Args::new()).await?;

    assert_eq!(log.entries(), vec!["Second.record".to_string()]);

    Ok(())
}

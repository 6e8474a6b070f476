// tests/library_registry.rs

mod common;
use crate::common::init_tracing;

use std::error::Error;

use scriptdag::library::registry::{CORE_RESOURCE, CORE_SYMBOL, DEPS_RESOURCE, DEPS_SYMBOL};
use scriptdag::library::{LibraryEntry, LibraryRegistry, ScanDiagnostic};

type TestResult = Result<(), Box<dyn Error>>;

fn symbols(registry: &LibraryRegistry) -> Vec<&str> {
    registry.entries().iter().map(|e| e.symbol.as_str()).collect()
}

#[test]
fn builtins_are_present_without_directives() -> TestResult {
    init_tracing();

    let registry = LibraryRegistry::from_script("default = \"build\"\n");

    assert_eq!(symbols(&registry), vec![CORE_SYMBOL, DEPS_SYMBOL]);
    assert_eq!(registry.resolve(CORE_SYMBOL), Some(CORE_RESOURCE));
    assert_eq!(registry.resolve(DEPS_SYMBOL), Some(DEPS_RESOURCE));
    assert!(registry.diagnostics().is_empty());

    Ok(())
}

#[test]
fn directive_adds_user_library_after_builtins() -> TestResult {
    init_tracing();

    let script = "#antlib Tools vendor/tools\n[[member]]\nname = \"build\"\n";
    let registry = LibraryRegistry::from_script(script);

    assert_eq!(symbols(&registry), vec![CORE_SYMBOL, DEPS_SYMBOL, "Tools"]);
    assert_eq!(registry.resolve("Tools"), Some("vendor/tools"));
    assert!(registry.contains("Tools"));
    assert!(!registry.contains("tools"));

    Ok(())
}

#[test]
fn directive_may_appear_anywhere_on_a_line() -> TestResult {
    init_tracing();

    let script = "name = \"app\"   #antlib Extra  lib/extra  \n";
    let registry = LibraryRegistry::from_script(script);

    assert_eq!(registry.resolve("Extra"), Some("lib/extra"));

    Ok(())
}

#[test]
fn later_declaration_wins_and_warns() -> TestResult {
    init_tracing();

    let script = "#antlib X a\n#antlib X b\n";
    let registry = LibraryRegistry::from_script(script);

    assert_eq!(registry.resolve("X"), Some("b"));
    assert_eq!(symbols(&registry), vec![CORE_SYMBOL, DEPS_SYMBOL, "X"]);

    let warnings: Vec<_> = registry.warnings().collect();
    assert_eq!(
        warnings,
        vec![&ScanDiagnostic::Overridden {
            line: 2,
            symbol: "X".to_string(),
            previous: "a".to_string(),
            resource: "b".to_string(),
        }]
    );
    assert_eq!(registry.errors().count(), 0);

    Ok(())
}

#[test]
fn overriding_a_builtin_keeps_its_position() -> TestResult {
    init_tracing();

    let registry = LibraryRegistry::from_script("#antlib Core my/core\n");

    assert_eq!(symbols(&registry), vec![CORE_SYMBOL, DEPS_SYMBOL]);
    assert_eq!(registry.resolve(CORE_SYMBOL), Some("my/core"));
    assert_eq!(registry.warnings().count(), 1);

    Ok(())
}

#[test]
fn malformed_directive_is_skipped_with_error() -> TestResult {
    init_tracing();

    let script = "#antlib OnlySymbol\n#antlib Good good/res\n#antlib A b c\n";
    let registry = LibraryRegistry::from_script(script);

    assert_eq!(symbols(&registry), vec![CORE_SYMBOL, DEPS_SYMBOL, "Good"]);
    assert!(!registry.contains("OnlySymbol"));
    assert!(!registry.contains("A"));

    let errors: Vec<_> = registry.errors().collect();
    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[0], ScanDiagnostic::Malformed { line: 1, .. }));
    assert!(matches!(errors[1], ScanDiagnostic::Malformed { line: 3, .. }));

    Ok(())
}

#[test]
fn declare_reports_replaced_resource() -> TestResult {
    init_tracing();

    let mut registry = LibraryRegistry::new();
    assert_eq!(registry.declare("Lib", "one"), None);
    assert_eq!(registry.declare("Lib", "two"), Some("one".to_string()));
    assert_eq!(
        registry.entries(),
        &[LibraryEntry {
            symbol: "Lib".to_string(),
            resource: "two".to_string(),
        }]
    );

    Ok(())
}

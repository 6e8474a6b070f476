// tests/script_loading.rs

mod common;
use crate::common::{fs_with_script, init_tracing, script_path, with_timeout};

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use scriptdag::dag::TargetCall;
use scriptdag::errors::ScriptdagError;
use scriptdag::fs::mock::MockFileSystem;
use scriptdag::fs::FileSystem;
use scriptdag::library::TaskCatalog;
use scriptdag::types::{EXIT_FAILURE, EXIT_SCRIPT_INVALID, EXIT_SCRIPT_NOT_FOUND};
use scriptdag::{execute_script, load_script};
use scriptdag_test_utils::recording::{recording_library, CallLog, RecordingListener};

type TestResult = Result<(), Box<dyn Error>>;

const APP_SCRIPT: &str = r#"
#antlib Tools vendor/tools
name = "app"
default = "package"

[[member]]
name = "clean"
doc = "Remove build outputs"
steps = [{ task = "Core.delete", args = { path = "out" } }]

[[member]]
name = "compile"
depends = ["clean"]
steps = [
  { task = "Core.mkdir", args = { dir = "out" } },
  { task = "Core.property", args = { name = "artifact", value = "out/app-${version}.txt" } },
]

[[member]]
name = "package"
doc = "Write the artifact"
depends = ["compile"]
steps = [{ task = "Core.write", args = { file = "${artifact}", content = "app ${version}" } }]

[[member]]
name = "publishRelease"
doc = "Publish the artifact"
target = true
params = [{ name = "channel", default = "stable", doc = "Release channel" }]
steps = [{ task = "Tools.record", args = { message = "${channel} ${artifact}" } }]

[[member]]
name = "helper"
private = true
steps = [{ task = "Core.echo", args = { message = "never a target" } }]
"#;

fn user_props(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn load_script_reflects_members_into_targets() -> TestResult {
    init_tracing();

    let fs = fs_with_script(APP_SCRIPT);
    let script = load_script(&fs, &script_path())?;

    assert_eq!(script.program.name, "app");
    assert_eq!(script.program.default_target.as_deref(), Some("package"));
    assert_eq!(script.registry.resolve("Tools"), Some("vendor/tools"));

    let names: Vec<&str> = script.descriptors.iter().map(|d| d.name()).collect();
    assert_eq!(names, vec!["clean", "compile", "package", "publish-release"]);

    let publish = &script.descriptors[3];
    let channel = publish.parameter("channel").ok_or("missing channel param")?;
    assert_eq!(channel.default().map(|d| d.source()), Some("stable"));
    assert_eq!(channel.description(), Some("Release channel"));

    Ok(())
}

#[test]
fn program_name_falls_back_to_file_stem() -> TestResult {
    init_tracing();

    let fs = fs_with_script("[[member]]\nname = \"only\"\n");
    let script = load_script(&fs, &script_path())?;

    assert_eq!(script.program.name, "Scriptdag");

    Ok(())
}

#[tokio::test]
async fn default_build_runs_core_tasks_against_the_filesystem() -> TestResult {
    init_tracing();

    let fs = fs_with_script(APP_SCRIPT);
    let outcome = with_timeout(execute_script(
        Arc::new(fs.clone()),
        &script_path(),
        &[],
        &user_props(&[("version", "1.2")]),
    ))
    .await?;

    assert!(outcome.is_success(), "{:?}", outcome.error());
    assert_eq!(outcome.executed(), &["clean", "compile", "package"]);
    assert!(fs.is_dir(Path::new("./out")));
    assert_eq!(fs.contents("./out/app-1.2.txt").as_deref(), Some("app 1.2"));

    Ok(())
}

#[tokio::test]
async fn user_library_is_resolved_through_the_catalog() -> TestResult {
    init_tracing();

    let log = CallLog::new();
    let events = CallLog::new();
    let fs = fs_with_script(APP_SCRIPT);
    let script = load_script(&fs, &script_path())?;

    let mut catalog = TaskCatalog::builtin();
    {
        let log = log.clone();
        catalog.register("vendor/tools", move || Arc::new(recording_library("Tools", &log)));
    }

    let mut ctx = script.context(Arc::new(fs.clone()), catalog);
    ctx.set_property("artifact", "out/app.txt");
    ctx.add_listener(Box::new(RecordingListener::new(&events)));

    assert!(!ctx.namespaces().is_loaded("Tools"));

    let outcome = script
        .engine()
        .run(
            &mut ctx,
            &[TargetCall::new("publish-release").with_arg("channel", "beta")],
        )
        .await;

    assert!(outcome.is_success(), "{:?}", outcome.error());
    assert_eq!(log.entries(), vec!["Tools.record(message=beta out/app.txt)"]);
    assert!(ctx.namespaces().is_loaded("Tools"));
    assert!(!ctx.namespaces().is_loaded("Deps"));

    Ok(())
}

#[tokio::test]
async fn unloadable_library_fails_only_when_used() -> TestResult {
    init_tracing();

    let fs = fs_with_script(APP_SCRIPT);

    // Tools points at a resource the built-in catalog does not have.
    let ok = execute_script(Arc::new(fs.clone()), &script_path(), &[TargetCall::new("clean")], &[])
        .await?;
    assert!(ok.is_success());

    let failed = execute_script(
        Arc::new(fs.clone()),
        &script_path(),
        &[TargetCall::new("publish-release")],
        &[],
    )
    .await?;
    assert_eq!(failed.exit_code(), EXIT_FAILURE);
    assert!(
        failed
            .error()
            .map(|e| e.to_string())
            .unwrap_or_default()
            .contains("vendor/tools")
    );

    Ok(())
}

#[tokio::test]
async fn missing_script_exits_with_not_found() -> TestResult {
    init_tracing();

    let fs = MockFileSystem::new();
    let err = execute_script(Arc::new(fs), &script_path(), &[], &[])
        .await
        .expect_err("script is missing");

    assert!(matches!(err, ScriptdagError::ScriptNotFound { .. }));
    assert_eq!(err.exit_code(), EXIT_SCRIPT_NOT_FOUND);

    Ok(())
}

#[test]
fn malformed_toml_exits_with_not_found() -> TestResult {
    init_tracing();

    let fs = fs_with_script("[[member]\nname = ");
    let err = load_script(&fs, &script_path()).expect_err("script does not parse");

    assert!(matches!(err, ScriptdagError::ScriptParse(_)));
    assert_eq!(err.exit_code(), EXIT_SCRIPT_NOT_FOUND);

    Ok(())
}

#[test]
fn verification_errors_exit_with_script_invalid() -> TestResult {
    init_tracing();

    let cases = [
        // Unknown library symbol in a step.
        "[[member]]\nname = \"a\"\nsteps = [{ task = \"Nope.run\" }]\n",
        // Member imported from an unregistered library.
        "[[member]]\nname = \"a\"\nfrom = \"Nope\"\n",
        // Same target name twice once hyphenated.
        "[[member]]\nname = \"buildJar\"\n\n[[member]]\nname = \"build-jar\"\n",
        // Step with both task and cmd.
        "[[member]]\nname = \"a\"\nsteps = [{ task = \"Core.echo\", cmd = \"ls\" }]\n",
        // Duplicate parameter.
        "[[member]]\nname = \"a\"\ntarget = true\nparams = [{ name = \"x\" }, { name = \"x\" }]\n",
        // Task reference without a symbol.
        "[[member]]\nname = \"a\"\nsteps = [{ task = \"echo\" }]\n",
    ];

    for case in cases {
        let fs = fs_with_script(case);
        let err = load_script(&fs, &script_path()).expect_err(case);
        assert!(matches!(err, ScriptdagError::ScriptInvalid(_)), "{case}: {err}");
        assert_eq!(err.exit_code(), EXIT_SCRIPT_INVALID);
    }

    Ok(())
}

#[test]
fn malformed_directive_does_not_stop_loading() -> TestResult {
    init_tracing();

    let fs = fs_with_script("#antlib Broken\n[[member]]\nname = \"a\"\n");
    let script = load_script(&fs, &script_path())?;

    assert_eq!(script.registry.errors().count(), 1);
    assert_eq!(script.descriptors.len(), 1);

    Ok(())
}

#[tokio::test]
async fn dependency_names_are_normalized() -> TestResult {
    init_tracing();

    let script_text = r#"
default = "ship"

[[member]]
name = "buildJar"
steps = [{ task = "Core.write", args = { file = "jar.txt", content = "jar" } }]

[[member]]
name = "ship"
depends = ["buildJar"]
steps = [{ task = "Core.write", args = { file = "ship.txt", content = "ship" } }]
"#;
    let fs = fs_with_script(script_text);
    let script = load_script(&fs, &script_path())?;
    assert_eq!(script.descriptors[1].dependencies(), &["build-jar".to_string()]);

    let outcome = execute_script(Arc::new(fs.clone()), &script_path(), &[], &[]).await?;
    assert_eq!(outcome.executed(), &["build-jar", "ship"]);
    assert_eq!(fs.contents("./jar.txt").as_deref(), Some("jar"));

    Ok(())
}

#[tokio::test]
async fn exit_task_stops_the_build() -> TestResult {
    init_tracing();

    let script_text = r#"
[[member]]
name = "check"
steps = [
  { task = "Core.exit" },
  { task = "Core.write", args = { file = "after-exit.txt" } },
]

[[member]]
name = "deploy"
depends = ["check"]
steps = [{ task = "Core.write", args = { file = "deployed.txt" } }]

[[member]]
name = "abort"
steps = [{ task = "Core.exit", args = { status = 5 } }]

[[member]]
name = "broken"
steps = [{ task = "Core.fail", args = { message = "boom" } }]
"#;
    let fs = fs_with_script(script_text);
    let path = script_path();

    let clean_stop = execute_script(Arc::new(fs.clone()), &path, &[TargetCall::new("deploy")], &[])
        .await?;
    assert!(clean_stop.is_success());
    assert_eq!(clean_stop.executed(), &["check"]);
    assert!(fs.contents("./after-exit.txt").is_none());
    assert!(fs.contents("./deployed.txt").is_none());

    let aborted = execute_script(Arc::new(fs.clone()), &path, &[TargetCall::new("abort")], &[])
        .await?;
    assert_eq!(aborted.exit_code(), 5);

    let broken = execute_script(Arc::new(fs.clone()), &path, &[TargetCall::new("broken")], &[])
        .await?;
    assert_eq!(broken.exit_code(), EXIT_FAILURE);

    Ok(())
}

#[tokio::test]
async fn graph_errors_from_scripts_exit_with_script_invalid() -> TestResult {
    init_tracing();

    let script_text = r#"
[[member]]
name = "a"
depends = ["b"]

[[member]]
name = "b"
depends = ["a"]
"#;
    let fs = fs_with_script(script_text);
    let outcome =
        execute_script(Arc::new(fs), &script_path(), &[TargetCall::new("a")], &[]).await?;

    assert_eq!(outcome.exit_code(), EXIT_SCRIPT_INVALID);
    assert!(
        outcome
            .error()
            .map(|e| e.to_string())
            .unwrap_or_default()
            .starts_with("circular dependency:")
    );

    Ok(())
}

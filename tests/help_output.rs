// tests/help_output.rs

mod common;
use crate::common::init_tracing;

use std::error::Error;

use scriptdag::program::{DefaultExpr, MemberParam};
use scriptdag::targets::help::{entries, render};
use scriptdag::targets::{reflect, HelpParam};
use scriptdag_test_utils::builders::{MemberBuilder, ProgramBuilder};

type TestResult = Result<(), Box<dyn Error>>;

fn sample_program() -> scriptdag::program::Program {
    ProgramBuilder::new("build")
        .member(MemberBuilder::new("clean").doc("Remove build outputs").build())
        .member(MemberBuilder::new("compile").depends(&["clean"]).build())
        .member(
            MemberBuilder::new("deploy")
                .doc("Deploy the artifact\nto the chosen environment")
                .target()
                .param(MemberParam::required("env").with_doc("Target environment"))
                .param(MemberParam::optional(
                    "version",
                    DefaultExpr::new("${build.version}", |_| "unused".to_string()),
                ))
                .build(),
        )
        .member(
            MemberBuilder::new("lint")
                .doc("Run the linter")
                .from_library("Tools")
                .target()
                .build(),
        )
        .build()
}

#[test]
fn help_lists_documented_targets_only() -> TestResult {
    init_tracing();

    let help = entries(&reflect(&sample_program()));
    let names: Vec<&str> = help.iter().map(|e| e.name.as_str()).collect();

    assert_eq!(names, vec!["clean", "deploy", "lint"]);
    assert_eq!(help[2].imported_from.as_deref(), Some("Tools"));
    assert_eq!(help[0].imported_from, None);

    Ok(())
}

#[test]
fn help_shows_default_source_without_evaluating() -> TestResult {
    init_tracing();

    let help = entries(&reflect(&sample_program()));
    let deploy = &help[1];

    assert_eq!(
        deploy.params,
        vec![
            HelpParam {
                name: "env".to_string(),
                default: None,
                description: Some("Target environment".to_string()),
            },
            HelpParam {
                name: "version".to_string(),
                default: Some("${build.version}".to_string()),
                description: None,
            },
        ]
    );

    Ok(())
}

#[test]
fn rendered_help_aligns_descriptions() -> TestResult {
    init_tracing();

    let text = render("Scriptdag.toml", &entries(&reflect(&sample_program())));

    let expected = [
        "",
        "Valid targets in Scriptdag.toml:",
        "",
        "  clean  -  Remove build outputs",
        "  deploy -  Deploy the artifact",
        "            to the chosen environment",
        "              -env: Target environment",
        "              -version (optional, default ${build.version})",
        "  lint   -  Run the linter",
        "              [in Tools]",
        "",
    ]
    .join("\n");
    assert_eq!(text, expected);

    Ok(())
}

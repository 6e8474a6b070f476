// src/script/loader.rs

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::errors::{Result, ScriptdagError};
use crate::fs::FileSystem;
use crate::library::registry::CORE_SYMBOL;
use crate::library::LibraryRegistry;
use crate::program::{DefaultExpr, Member, MemberParam, Program, TargetMarker};
use crate::script::body::{ScriptBody, Step};
use crate::script::interpolate::interpolate;
use crate::script::model::{RawMember, RawScript, RawStep};
use crate::script::validate::validate_script;
use crate::types::{Args, Owner, Visibility};

/// Read the raw script text. Failure here is fatal for the whole run.
pub fn read_script(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    fs.read_to_string(path)
        .map_err(|e| ScriptdagError::ScriptNotFound {
            path: path.display().to_string(),
            reason: format!("{e:#}"),
        })
}

/// Parse TOML only; no semantic checks.
pub fn parse_script(text: &str) -> Result<RawScript> {
    Ok(toml::from_str(text)?)
}

/// Parse, verify and convert a script into a [`Program`].
///
/// `registry` must already contain the script's own library directives
/// (see [`LibraryRegistry::from_script`]); `fallback_name` is used when the
/// script does not name itself.
pub fn load_program(text: &str, registry: &LibraryRegistry, fallback_name: &str) -> Result<Program> {
    let raw = parse_script(text)?;
    validate_script(&raw, registry)?;

    let mut program = Program::new(raw.name.clone().unwrap_or_else(|| fallback_name.to_string()));
    if let Some(default) = &raw.default {
        program = program.with_default_target(default.clone());
    }

    for raw_member in &raw.member {
        program.push_member(to_member(raw_member)?);
    }

    debug!(program = %program.name, members = program.members().len(), "loaded build script");
    Ok(program)
}

fn to_member(raw: &RawMember) -> Result<Member> {
    let steps = raw
        .steps
        .iter()
        .map(|step| to_step(&raw.name, step))
        .collect::<Result<Vec<_>>>()?;

    let mut member = Member::new(raw.name.clone(), Arc::new(ScriptBody::new(&raw.name, steps)));
    member.doc = raw.doc.clone();
    member.visibility = if raw.private {
        Visibility::Private
    } else {
        Visibility::Public
    };
    member.owner = match &raw.from {
        Some(symbol) => Owner::Library(symbol.clone()),
        None => Owner::Program,
    };
    if raw.has_marker() {
        member.marker = Some(TargetMarker {
            depends: raw.depends.clone().unwrap_or_default(),
        });
    }
    member.params = raw
        .params
        .iter()
        .map(|p| MemberParam {
            name: p.name.clone(),
            doc: p.doc.clone(),
            default: p.default.as_deref().map(property_default),
        })
        .collect();

    Ok(member)
}

/// A default expression whose `${property}` references are looked up in the
/// build context when the default is evaluated.
fn property_default(source: &str) -> DefaultExpr {
    let template = source.to_string();
    DefaultExpr::new(source, move |ctx| {
        interpolate(&template, |name| ctx.property(name).map(str::to_string))
    })
}

fn to_step(member: &str, raw: &RawStep) -> Result<Step> {
    let mut args = Args::new();
    for (key, value) in &raw.args {
        let value = match value {
            toml::Value::String(s) => s.clone(),
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            other => {
                return Err(ScriptdagError::ScriptInvalid(format!(
                    "member '{member}': argument '{key}' must be a string, number or boolean (got {})",
                    other.type_str()
                )));
            }
        };
        args.insert(key.clone(), value);
    }

    let task = match (&raw.task, &raw.cmd) {
        (Some(task), _) => task.clone(),
        (None, Some(cmd)) => {
            args.insert("command".to_string(), cmd.clone());
            format!("{CORE_SYMBOL}.exec")
        }
        (None, None) => {
            return Err(ScriptdagError::ScriptInvalid(format!(
                "member '{member}' has a step without `task` or `cmd`"
            )));
        }
    };

    Ok(Step { task, args })
}

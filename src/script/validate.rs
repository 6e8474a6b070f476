// src/script/validate.rs

use std::collections::HashSet;

use crate::errors::{Result, ScriptdagError};
use crate::library::namespace::split_reference;
use crate::library::LibraryRegistry;
use crate::script::model::{RawMember, RawScript, RawStep};
use crate::targets::camel_to_hyphen;

/// Verify a parsed script before it becomes a program.
///
/// Library references are checked against the registry only; no library is
/// loaded here.
pub fn validate_script(script: &RawScript, registry: &LibraryRegistry) -> Result<()> {
    validate_member_names(script)?;
    for member in &script.member {
        validate_owner(member, registry)?;
        validate_params(member)?;
        for step in &member.steps {
            validate_step(member, step, registry)?;
        }
    }
    Ok(())
}

fn validate_member_names(script: &RawScript) -> Result<()> {
    let mut seen = HashSet::new();
    for member in &script.member {
        if member.name.trim().is_empty() {
            return Err(ScriptdagError::ScriptInvalid(
                "every [[member]] needs a non-empty `name`".to_string(),
            ));
        }
        if !seen.insert(camel_to_hyphen(&member.name)) {
            return Err(ScriptdagError::ScriptInvalid(format!(
                "member '{}' is declared more than once",
                member.name
            )));
        }
    }
    Ok(())
}

fn validate_owner(member: &RawMember, registry: &LibraryRegistry) -> Result<()> {
    match &member.from {
        Some(symbol) if !registry.contains(symbol) => Err(ScriptdagError::ScriptInvalid(format!(
            "member '{}' is imported from unknown library '{}'",
            member.name, symbol
        ))),
        _ => Ok(()),
    }
}

fn validate_params(member: &RawMember) -> Result<()> {
    let mut seen = HashSet::new();
    for param in &member.params {
        if !seen.insert(param.name.as_str()) {
            return Err(ScriptdagError::ScriptInvalid(format!(
                "member '{}' declares parameter '{}' more than once",
                member.name, param.name
            )));
        }
    }
    Ok(())
}

fn validate_step(member: &RawMember, step: &RawStep, registry: &LibraryRegistry) -> Result<()> {
    let task = match (&step.task, &step.cmd) {
        (Some(task), None) => task,
        (None, Some(_)) => return Ok(()),
        _ => {
            return Err(ScriptdagError::ScriptInvalid(format!(
                "each step of member '{}' needs exactly one of `task` or `cmd`",
                member.name
            )));
        }
    };

    let (symbol, _) = split_reference(task).map_err(|e| {
        ScriptdagError::ScriptInvalid(format!("member '{}': {e}", member.name))
    })?;
    if !registry.contains(symbol) {
        return Err(ScriptdagError::ScriptInvalid(format!(
            "member '{}' uses task '{}' from unknown library '{}'",
            member.name, task, symbol
        )));
    }
    Ok(())
}

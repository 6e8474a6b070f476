// src/targets/reflector.rs

use tracing::debug;

use crate::program::{Member, Program};
use crate::targets::descriptor::{ParamDescriptor, TargetDescriptor};
use crate::types::Visibility;

/// Convert a camelCase member name to its hyphenated target name.
///
/// `buildJar` becomes `build-jar`. Names that are already hyphenated come
/// back unchanged.
pub fn camel_to_hyphen(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 && !out.ends_with('-') {
                out.push('-');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Whether a member is exposed as a target.
///
/// Public members qualify when they carry an explicit target marker, or when
/// they take no parameters and are declared by the program itself.
/// Imported library members always need the marker.
pub fn is_target_member(member: &Member) -> bool {
    member.visibility == Visibility::Public
        && (member.marker.is_some() || (member.params.is_empty() && member.owner.is_program()))
}

/// Reflect a program into its targets, in member declaration order.
///
/// Pure over the program: reflecting the same program twice yields equal
/// descriptor lists. Default expressions are captured, not evaluated.
pub fn reflect(program: &Program) -> Vec<TargetDescriptor> {
    let descriptors: Vec<TargetDescriptor> = program
        .members()
        .iter()
        .filter(|m| is_target_member(m))
        .map(describe)
        .collect();

    debug!(
        program = %program.name,
        members = program.members().len(),
        targets = descriptors.len(),
        "reflected program"
    );

    descriptors
}

fn describe(member: &Member) -> TargetDescriptor {
    let dependencies = member
        .marker
        .as_ref()
        .map(|marker| {
            marker
                .depends
                .iter()
                .map(|dep| camel_to_hyphen(dep))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let parameters = member
        .params
        .iter()
        .map(|p| ParamDescriptor::new(p.name.clone(), p.default.clone(), p.doc.clone()))
        .collect();

    TargetDescriptor::new(camel_to_hyphen(&member.display_name), member.body.clone())
        .with_description(member.doc.clone())
        .with_dependencies(dependencies)
        .with_parameters(parameters)
        .with_owner(member.owner.clone())
}

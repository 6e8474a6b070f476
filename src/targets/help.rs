// src/targets/help.rs

//! Help data for documented targets.
//!
//! Undocumented targets stay runnable but are left out of help listings.

use crate::targets::descriptor::TargetDescriptor;
use crate::types::Owner;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpParam {
    pub name: String,
    /// Source text of the default expression, for optional parameters.
    pub default: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    pub name: String,
    pub description: String,
    /// Library symbol for imported targets.
    pub imported_from: Option<String>,
    pub params: Vec<HelpParam>,
}

/// Help entries for documented targets, in descriptor order.
pub fn entries(descriptors: &[TargetDescriptor]) -> Vec<HelpEntry> {
    descriptors
        .iter()
        .filter(|d| d.is_documented())
        .map(|d| HelpEntry {
            name: d.name().to_string(),
            description: d.description().unwrap_or_default().trim().to_string(),
            imported_from: match d.owner() {
                Owner::Program => None,
                Owner::Library(symbol) => Some(symbol.clone()),
            },
            params: d
                .parameters()
                .iter()
                .map(|p| HelpParam {
                    name: p.name().to_string(),
                    default: p.default().map(|e| e.source().to_string()),
                    description: p
                        .description()
                        .filter(|s| !s.trim().is_empty())
                        .map(str::to_string),
                })
                .collect(),
        })
        .collect()
}

/// Plain-text listing, names padded to a common width and continuation
/// lines indented under the description column.
pub fn render(script: &str, entries: &[HelpEntry]) -> String {
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    let mut out = format!("\nValid targets in {script}:\n\n");

    for entry in entries {
        let mut lines: Vec<String> = entry.description.lines().map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        if let Some(symbol) = &entry.imported_from {
            lines.push(format!("  [in {symbol}]"));
        }
        for param in &entry.params {
            let mut line = format!("  -{}", param.name);
            if let Some(default) = &param.default {
                line.push_str(&format!(" (optional, default {default})"));
            }
            if let Some(description) = &param.description {
                line.push_str(&format!(": {description}"));
            }
            lines.push(line);
        }

        let head = format!("  {:<width$} -  ", entry.name);
        let indent = " ".repeat(head.len());
        for (i, line) in lines.iter().enumerate() {
            if i == 0 {
                out.push_str(&head);
            } else {
                out.push_str(&indent);
            }
            out.push_str(line);
            out.push('\n');
        }
    }

    out
}

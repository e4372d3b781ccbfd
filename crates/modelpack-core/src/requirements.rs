//! Requirement extraction from notebook cells.
//!
//! A notebook declares its dependencies in exactly one cell, either a raw
//! cell tagged `requirements` or a code cell whose first line is the
//! `# !requirements` marker. Anything else is a format error.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::notebook::{Cell, CellKind, Notebook};

/// Tag that marks a raw cell as the requirement cell.
pub const REQUIREMENTS_TAG: &str = "requirements";

static REQUIREMENTS_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A# *!requirements *\n?\z").expect("valid marker pattern"));

// PEP 508-ish subset: lowercase name, optional comparator and version token.
static SPECIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A[a-z0-9][a-z0-9_.-]*((<|<=|!=|==|>=|>|~=|===)[^ \n]+)?\z")
        .expect("valid specifier pattern")
});

fn is_raw_requirement_cell(cell: &Cell) -> bool {
    cell.cell_type == CellKind::Raw && cell.has_tag(REQUIREMENTS_TAG)
}

fn is_comment_requirement_cell(cell: &Cell) -> bool {
    cell.cell_type == CellKind::Code
        && cell
            .first_source_line()
            .is_some_and(|line| REQUIREMENTS_MARKER.is_match(line))
}

/// Extract the dependency specifiers declared in the notebook.
///
/// Fails with [`Error::InvalidRequirements`] when no cell or more than one
/// cell declares requirements, when a comment-style cell contains a line not
/// starting with `#`, or when a specifier does not match the grammar.
pub fn extract_requirements(notebook: &Notebook) -> Result<Vec<String>> {
    let mut qualifying = notebook
        .cells
        .iter()
        .filter(|c| is_raw_requirement_cell(c) || is_comment_requirement_cell(c));

    let Some(cell) = qualifying.next() else {
        return Err(Error::InvalidRequirements(
            "couldn't find any requirements".to_string(),
        ));
    };
    if qualifying.next().is_some() {
        return Err(Error::InvalidRequirements(
            "only one requirement cell is allowed, but found multiple".to_string(),
        ));
    }

    let requirements = if is_raw_requirement_cell(cell) {
        extract_raw_cell(cell)
    } else {
        extract_comment_cell(cell)?
    };

    validate_specifiers(&requirements)?;
    Ok(requirements)
}

/// Tagged raw cell: every non-blank line is a specifier, kept verbatim.
fn extract_raw_cell(cell: &Cell) -> Vec<String> {
    cell.source
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Comment-marked code cell: the marker line is dropped and every remaining
/// non-blank line must be a `#` comment holding one specifier.
fn extract_comment_cell(cell: &Cell) -> Result<Vec<String>> {
    let mut requirements = Vec::new();
    for line in cell.source.iter().skip(1) {
        if let Some(rest) = line.strip_prefix('#') {
            let requirement = rest.trim();
            if !requirement.is_empty() {
                requirements.push(requirement.to_string());
            }
        } else if !line.trim().is_empty() {
            return Err(Error::InvalidRequirements(
                "all lines in the requirement cell must start with #".to_string(),
            ));
        }
    }
    Ok(requirements)
}

fn validate_specifiers(requirements: &[String]) -> Result<()> {
    for requirement in requirements {
        if !SPECIFIER.is_match(requirement) {
            return Err(Error::InvalidRequirements(format!(
                "invalid format for the requirement `{requirement}`"
            )));
        }
    }
    Ok(())
}

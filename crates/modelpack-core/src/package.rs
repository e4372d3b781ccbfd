//! Source package assembly.
//!
//! Reads a notebook, runs the extraction pipeline, and lays out the package
//! tree on disk:
//!
//! ```text
//! <build_dir>/<name>/
//!     __init__.py
//!     setup.py
//!     <name>/
//!         __init__.py
//!         model.py
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::glue::{self, Capability};
use crate::model_code;
use crate::notebook::Notebook;
use crate::requirements;
use crate::setup_file;

static LEADING_NON_LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A[^a-z]+").expect("valid name pattern"));
static INVALID_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9a-z-]").expect("valid name pattern"));

/// Normalize a proposed package name.
///
/// Lowercases, maps underscores to hyphens, strips leading non-letters, and
/// drops every character outside `[0-9a-z-]`.
pub fn sanitize_package_name(name: &str) -> String {
    let name = name.to_lowercase().replace('_', "-");
    let name = LEADING_NON_LETTERS.replace(&name, "");
    INVALID_NAME_CHARS.replace_all(&name, "").into_owned()
}

/// Build a deployable source package from a notebook.
///
/// Returns the path of the generated package directory. Any previously built
/// package of the same name under `build_dir` is replaced.
pub fn build_package(
    notebook_path: &Path,
    capability: Capability,
    name: &str,
    description: &str,
    build_dir: &Path,
) -> Result<PathBuf> {
    let notebook = Notebook::read_from_file(notebook_path)?;
    let requirements = requirements::extract_requirements(&notebook)?;
    let source_code = model_code::extract_source_code(&notebook);
    let model_file = glue::generate_model_file(&source_code, capability)?;

    tracing::debug!(
        "extracted {} requirements and {} bytes of source from {}",
        requirements.len(),
        source_code.len(),
        notebook_path.display()
    );

    let module_name = name.replace('-', "_");
    let package_dir = build_dir.join(&module_name);
    let module_dir = package_dir.join(&module_name);

    if package_dir.exists() {
        fs::remove_dir_all(&package_dir).map_err(|e| Error::WriteError {
            path: package_dir.clone(),
            message: e.to_string(),
        })?;
    }
    fs::create_dir_all(&module_dir).map_err(|e| Error::WriteError {
        path: module_dir.clone(),
        message: e.to_string(),
    })?;

    write_file(package_dir.join("__init__.py"), "")?;
    write_file(module_dir.join("__init__.py"), "")?;
    write_file(
        package_dir.join("setup.py"),
        &setup_file::setup_file_content(&requirements, name, description),
    )?;
    write_file(module_dir.join("model.py"), &model_file)?;

    tracing::info!("built package `{}` at {}", name, package_dir.display());
    Ok(package_dir)
}

fn write_file(path: PathBuf, content: &str) -> Result<()> {
    fs::write(&path, content).map_err(|e| Error::WriteError {
        path,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_package_name() {
        let cases = [
            ("something", "something"),
            ("some_thing", "some-thing"),
            ("sometHing", "something"),
            ("123something", "something"),
            ("s123omething", "s123omething"),
            ("-something", "something"),
            ("some-thing", "some-thing"),
            ("#some^%$^thing", "something"),
        ];
        for (input, expected) in cases {
            assert_eq!(sanitize_package_name(input), expected, "input `{input}`");
        }
    }

    #[test]
    fn test_sanitize_to_empty() {
        assert_eq!(sanitize_package_name("123"), "");
        assert_eq!(sanitize_package_name(""), "");
    }
}

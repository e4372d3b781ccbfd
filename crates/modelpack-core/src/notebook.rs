//! Jupyter notebook (.ipynb) document model.
//!
//! A minimal serde view of the notebook format: only the fields the
//! extraction pipeline reads. Cells are immutable inputs and are never
//! mutated by this crate.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The only supported notebook format version.
pub const SUPPORTED_NBFORMAT: u32 = 4;

/// A Jupyter notebook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notebook {
    /// Format version (must be 4)
    pub nbformat: u32,

    /// Notebook cells, in document order
    #[serde(default)]
    pub cells: Vec<Cell>,
}

/// One notebook cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    /// Cell kind
    pub cell_type: CellKind,

    /// Cell metadata (absent in older documents)
    #[serde(default)]
    pub metadata: CellMetadata,

    /// Cell source (lines, with embedded newlines)
    #[serde(default)]
    pub source: Vec<String>,
}

/// Kind of cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    /// Executable code cell
    Code,
    /// Raw text cell
    Raw,
    /// Markdown documentation cell
    Markdown,
    /// Any cell type this crate does not act on
    #[serde(other)]
    Other,
}

/// Cell metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CellMetadata {
    /// Tags attached to the cell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Notebook {
    /// Create a notebook with the supported format version.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            nbformat: SUPPORTED_NBFORMAT,
            cells,
        }
    }

    /// Parse a notebook from its JSON representation.
    ///
    /// Fails if the format version is anything other than 4.
    pub fn from_json(json: &str) -> Result<Self> {
        let notebook: Self = serde_json::from_str(json)?;
        if notebook.nbformat != SUPPORTED_NBFORMAT {
            return Err(Error::UnsupportedNotebookVersion(notebook.nbformat));
        }
        Ok(notebook)
    }

    /// Read a notebook from an `.ipynb` file.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::ReadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }
}

impl Cell {
    /// Create a cell with no metadata.
    pub fn new(cell_type: CellKind, source: Vec<String>) -> Self {
        Self {
            cell_type,
            metadata: CellMetadata::default(),
            source,
        }
    }

    /// Attach tags to this cell.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.metadata.tags = Some(tags);
        self
    }

    /// Whether the cell carries the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.metadata
            .tags
            .as_deref()
            .is_some_and(|tags| tags.iter().any(|t| t == tag))
    }

    /// The first source line, if any.
    pub fn first_source_line(&self) -> Option<&str> {
        self.source.first().map(String::as_str)
    }
}

//! Core packaging pipeline for modelpack.
//!
//! Turns a Jupyter notebook into a deployable model source package:
//!
//! ```text
//! notebook.ipynb ──► extract_requirements ──► specifier list ──► setup.py
//!                └─► extract_source_code ──► validated source ──► model.py
//!                                                (glue wrapper appended)
//! ```
//!
//! All extraction and synthesis functions are pure: notebook in, text or a
//! format error out. Filesystem access is confined to [`Notebook::read_from_file`]
//! and [`build_package`].

mod error;
mod glue;
mod model_code;
mod notebook;
mod package;
mod requirements;
mod setup_file;

pub use error::{Error, Result};
pub use glue::{generate_model_file, Capability};
pub use model_code::{
    extract_source_code, function_signature, has_load_and_predict_functions, has_train_function,
    user_defined_predict_parameters, user_defined_train_parameters, CELL_MARKER, MODEL_TAG,
};
pub use notebook::{Cell, CellKind, CellMetadata, Notebook, SUPPORTED_NBFORMAT};
pub use package::{build_package, sanitize_package_name};
pub use requirements::{extract_requirements, REQUIREMENTS_TAG};
pub use setup_file::setup_file_content;

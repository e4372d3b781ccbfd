//! Model code extraction and contract validation.
//!
//! Code cells tagged `model` (or starting with the `# !model` marker) are
//! concatenated into one source text, which must then satisfy a small
//! functional contract: `train_model(open_artifact, ...)`,
//! `load_model(open_artifact)`, and `predict(...)` with a leading `model`
//! parameter only when `load_model` is defined.
//!
//! Matching is deliberately line-oriented (exact full-line matches) rather
//! than grammar-based; duplicate definitions of a tracked function are a
//! fatal ambiguity.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::notebook::{Cell, CellKind, Notebook};

/// Tag that marks a code cell for inclusion in the package.
pub const MODEL_TAG: &str = "model";

/// Marker line emitted before every included cell.
pub const CELL_MARKER: &str = "# !notebook-cell";

static MODEL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A# *!model *\n?\z").expect("valid marker pattern"));

fn should_include_cell(cell: &Cell) -> bool {
    cell.has_tag(MODEL_TAG)
        || cell
            .first_source_line()
            .is_some_and(|line| MODEL_MARKER.is_match(line))
}

/// Concatenate the notebook's marked code cells into one source text.
///
/// Each included cell is preceded by the [`CELL_MARKER`] line and followed by
/// two blank lines; the trailing separator collapses to a single newline.
/// A notebook with no marked cells yields just `"\n"`.
pub fn extract_source_code(notebook: &Notebook) -> String {
    let mut pieces: Vec<&str> = Vec::new();
    for cell in &notebook.cells {
        if cell.cell_type == CellKind::Code && !cell.source.is_empty() && should_include_cell(cell)
        {
            pieces.push(CELL_MARKER);
            pieces.push("\n");
            pieces.extend(cell.source.iter().map(String::as_str));
            pieces.push("\n\n\n");
        }
    }
    pieces.pop();
    pieces.push("\n");
    pieces.concat()
}

/// Find the raw parameter string of a top-level `def <name>(...):` line.
///
/// Returns `None` when the function is not defined. Two or more definitions
/// of the same tracked function are rejected outright.
pub fn function_signature(source_code: &str, function_name: &str) -> Result<Option<String>> {
    let pattern = Regex::new(&format!(
        r"\Adef {}\(([^)]*)\): *\z",
        regex::escape(function_name)
    ))
    .expect("valid definition pattern");

    let mut signatures = Vec::new();
    for line in source_code.split('\n') {
        if let Some(captures) = pattern.captures(line) {
            signatures.push(captures[1].to_string());
        }
    }

    if signatures.len() > 1 {
        return Err(Error::InvalidCodeFormat(format!(
            "multiple definitions of {function_name}()"
        )));
    }
    Ok(signatures.into_iter().next())
}

/// Expected parameter shape for one of the tracked contract functions.
///
/// The two predict shapes are kept as distinct variants: the position of
/// `instance` shifts depending on whether a `load_model` is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParameterShape {
    /// `open_artifact` first, arbitrary extras after
    Train,
    /// exactly `open_artifact`
    Load,
    /// `model, instance` first, arbitrary extras after
    PredictWithModel,
    /// `instance` first, arbitrary extras after
    PredictStateless,
}

static TRAIN_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\Aopen_artifact(,.*)?\z").expect("valid shape pattern"));
static LOAD_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\Aopen_artifact\z").expect("valid shape pattern"));
static PREDICT_WITH_MODEL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\Amodel, instance(,.*)?\z").expect("valid shape pattern"));
static PREDICT_STATELESS_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\Ainstance(,.*)?\z").expect("valid shape pattern"));

impl ParameterShape {
    fn pattern(self) -> &'static Regex {
        match self {
            ParameterShape::Train => &TRAIN_SHAPE,
            ParameterShape::Load => &LOAD_SHAPE,
            ParameterShape::PredictWithModel => &PREDICT_WITH_MODEL_SHAPE,
            ParameterShape::PredictStateless => &PREDICT_STATELESS_SHAPE,
        }
    }

    fn error_message(self) -> &'static str {
        match self {
            ParameterShape::Train => {
                "train_model() must have `open_artifact` as its first parameter \
                 (additional user defined parameters are allowed)"
            }
            ParameterShape::Load => "load_model() must have `open_artifact` as its only parameter",
            ParameterShape::PredictWithModel => {
                "predict() must have `model` as its first parameter and `instance` as its \
                 second parameter (additional user defined parameters are allowed) \
                 when a load_model() function is defined"
            }
            ParameterShape::PredictStateless => {
                "predict() must have `instance` as its first parameter \
                 (additional user defined parameters are allowed) \
                 when no load_model() function is defined"
            }
        }
    }
}

fn has_function(source_code: &str, name: &str, shape: ParameterShape) -> Result<bool> {
    let Some(parameters) = function_signature(source_code, name)? else {
        return Ok(false);
    };
    if shape.pattern().is_match(&parameters) {
        Ok(true)
    } else {
        Err(Error::InvalidCodeFormat(shape.error_message().to_string()))
    }
}

/// Whether the source defines a valid `train_model` function.
pub fn has_train_function(source_code: &str) -> Result<bool> {
    has_function(source_code, "train_model", ParameterShape::Train)
}

/// Whether the source defines valid `load_model` and `predict` functions.
///
/// Returns `(has_load, has_predict)`. A `load_model` without a matching
/// `predict` is a fatal format error.
pub fn has_load_and_predict_functions(source_code: &str) -> Result<(bool, bool)> {
    let has_load = has_function(source_code, "load_model", ParameterShape::Load)?;

    let predict_shape = if has_load {
        ParameterShape::PredictWithModel
    } else {
        ParameterShape::PredictStateless
    };
    let has_predict = has_function(source_code, "predict", predict_shape)?;

    if has_load && !has_predict {
        return Err(Error::InvalidCodeFormat(
            "a load_model() function was defined, but no predict() function".to_string(),
        ));
    }
    Ok((has_load, has_predict))
}

/// Parse a validated function's parameters into trimmed names.
fn function_parameters(source_code: &str, function_name: &str) -> Result<Vec<String>> {
    let signature = function_signature(source_code, function_name)?.ok_or_else(|| {
        Error::InvalidCodeFormat(format!("the function {function_name}() is not defined"))
    })?;

    let parameters: Vec<String> = signature.split(',').map(|p| p.trim().to_string()).collect();
    for (index, parameter) in parameters.iter().enumerate() {
        if parameters[..index].contains(parameter) {
            return Err(Error::InvalidCodeFormat(format!(
                "duplicate parameter `{parameter}` in {function_name}()"
            )));
        }
    }
    Ok(parameters)
}

/// The user-defined parameters of `train_model`: everything after
/// `open_artifact`.
pub fn user_defined_train_parameters(source_code: &str) -> Result<Vec<String>> {
    let mut parameters = function_parameters(source_code, "train_model")?;
    Ok(parameters.split_off(1))
}

/// The user-defined parameters of `predict`: everything after `instance`.
pub fn user_defined_predict_parameters(source_code: &str) -> Result<Vec<String>> {
    let mut parameters = function_parameters(source_code, "predict")?;
    let position = parameters
        .iter()
        .position(|p| p == "instance")
        .ok_or_else(|| {
            Error::InvalidCodeFormat("predict() must have an `instance` parameter".to_string())
        })?;
    Ok(parameters.split_off(position + 1))
}

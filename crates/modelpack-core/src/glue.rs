//! Wrapper class synthesis over the user's free functions.
//!
//! Emits the assembled source followed by a generated `Model` class exposing
//! fixed `train`/`load`/`predict` entry points that forward to the user's
//! `train_model`/`load_model`/`predict` functions.

use crate::error::{Error, Result};
use crate::model_code;

/// Operations the packaged model must expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Prediction only
    Predict,
    /// Training only
    Train,
    /// Both training and prediction
    PredictAndTrain,
}

impl Capability {
    /// Whether the package must expose a `train` entry point.
    pub fn wants_train(self) -> bool {
        match self {
            Capability::Train | Capability::PredictAndTrain => true,
            Capability::Predict => false,
        }
    }

    /// Whether the package must expose a `predict` entry point.
    pub fn wants_predict(self) -> bool {
        match self {
            Capability::Predict | Capability::PredictAndTrain => true,
            Capability::Train => false,
        }
    }
}

const GLUE_HEADER: &str = "# !auto-generated\nclass Model:";
const GLUE_CONSTRUCTOR: &str = "    def __init__(self, model):\n        self._model = model\n";
const GLUE_LOAD: &str = "    @staticmethod\n    def load(open_artifact):\n        return Model(load_model(open_artifact))\n";
const GLUE_STATELESS_LOAD: &str =
    "    @staticmethod\n    def load(open_artifact):\n        return Model()\n";

/// Validate the assembled source against the requested capability and append
/// the generated wrapper class.
///
/// The discovered functions must match the request exactly: a required
/// function may not be missing, and a function outside the request may not
/// be defined.
pub fn generate_model_file(source_code: &str, capability: Capability) -> Result<String> {
    let has_train = model_code::has_train_function(source_code)?;
    let (has_load, has_predict) = model_code::has_load_and_predict_functions(source_code)?;

    if capability.wants_train() && !has_train {
        return Err(Error::InvalidCodeFormat(
            "missing required train_model() function".to_string(),
        ));
    }
    if capability.wants_predict() && !has_predict {
        return Err(Error::InvalidCodeFormat(
            "missing required predict() function".to_string(),
        ));
    }
    if !capability.wants_train() && has_train {
        return Err(Error::InvalidCodeFormat(
            "a train_model() function must not be defined when training is not requested"
                .to_string(),
        ));
    }
    if !capability.wants_predict() && has_predict {
        return Err(Error::InvalidCodeFormat(
            "a predict() function must not be defined when prediction is not requested"
                .to_string(),
        ));
    }

    let mut sections = vec![format!("{source_code}\n"), GLUE_HEADER.to_string()];

    if has_load {
        sections.push(GLUE_CONSTRUCTOR.to_string());
    }
    if has_train {
        let extras = model_code::user_defined_train_parameters(source_code)?;
        sections.push(train_method(&extras));
    }
    if has_predict {
        let load = if has_load { GLUE_LOAD } else { GLUE_STATELESS_LOAD };
        sections.push(load.to_string());

        let extras = model_code::user_defined_predict_parameters(source_code)?;
        sections.push(predict_method(&extras, has_load));
    }

    Ok(sections.join("\n"))
}

fn train_method(extras: &[String]) -> String {
    let parameters = join_parameters("open_artifact", extras);
    format!(
        "    @staticmethod\n    def train({parameters}):\n        train_model({parameters})\n"
    )
}

fn predict_method(extras: &[String], has_load: bool) -> String {
    let parameters = join_parameters("instance", extras);
    let forwarded = if has_load {
        join_parameters("self._model, instance", extras)
    } else {
        parameters.clone()
    };
    format!("    def predict(self, {parameters}):\n        return predict({forwarded})\n")
}

/// Comma-join the fixed leading parameters with the user's extras, verbatim
/// and order-preserving.
fn join_parameters(leading: &str, extras: &[String]) -> String {
    if extras.is_empty() {
        leading.to_string()
    } else {
        format!("{leading}, {}", extras.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRAIN_PREDICT_SOURCE: &str = "\
# !notebook-cell
def train_model(open_artifact, data_spec):
    pass


# !notebook-cell
def load_model(open_artifact):
    pass


# !notebook-cell
def predict(model, instance, some_argument):
    pass
";

    #[test]
    fn test_capability_queries_are_exhaustive() {
        assert!(!Capability::Predict.wants_train());
        assert!(Capability::Predict.wants_predict());
        assert!(Capability::Train.wants_train());
        assert!(!Capability::Train.wants_predict());
        assert!(Capability::PredictAndTrain.wants_train());
        assert!(Capability::PredictAndTrain.wants_predict());
    }

    #[test]
    fn test_full_train_predict_wrapper() {
        let expected = "\
# !notebook-cell
def train_model(open_artifact, data_spec):
    pass


# !notebook-cell
def load_model(open_artifact):
    pass


# !notebook-cell
def predict(model, instance, some_argument):
    pass


# !auto-generated
class Model:
    def __init__(self, model):
        self._model = model

    @staticmethod
    def train(open_artifact, data_spec):
        train_model(open_artifact, data_spec)

    @staticmethod
    def load(open_artifact):
        return Model(load_model(open_artifact))

    def predict(self, instance, some_argument):
        return predict(self._model, instance, some_argument)
";
        let content =
            generate_model_file(TRAIN_PREDICT_SOURCE, Capability::PredictAndTrain).unwrap();
        assert_eq!(content, expected);
    }

    #[test]
    fn test_stateless_predict_wrapper() {
        let source = "def predict(instance):\n    pass\n";
        let content = generate_model_file(source, Capability::Predict).unwrap();

        assert!(content.contains("    @staticmethod\n    def load(open_artifact):\n        return Model()\n"));
        assert!(content.contains("    def predict(self, instance):\n        return predict(instance)\n"));
        assert!(!content.contains("__init__"));
    }

    #[test]
    fn test_stateful_predict_wrapper() {
        let source =
            "def load_model(open_artifact):\n    pass\ndef predict(model, instance):\n    pass\n";
        let content = generate_model_file(source, Capability::Predict).unwrap();

        assert!(content.contains("    def __init__(self, model):\n        self._model = model\n"));
        assert!(content.contains("return Model(load_model(open_artifact))"));
        assert!(content.contains("    def predict(self, instance):\n        return predict(self._model, instance)\n"));
    }

    #[test]
    fn test_train_only_wrapper() {
        let source = "def train_model(open_artifact, data_spec):\n    pass\n";
        let content = generate_model_file(source, Capability::Train).unwrap();

        assert!(content.contains("def train(open_artifact, data_spec):"));
        assert!(content.contains("train_model(open_artifact, data_spec)"));
        assert!(!content.contains("def load("));
        assert!(!content.contains("def predict("));
    }

    #[test]
    fn test_missing_required_train() {
        let source = "def predict(instance):\n    pass\n";
        let err = generate_model_file(source, Capability::PredictAndTrain).unwrap_err();
        assert!(err.to_string().contains("missing required train_model()"));
    }

    #[test]
    fn test_missing_required_predict() {
        let source = "def train_model(open_artifact):\n    pass\n";
        let err = generate_model_file(source, Capability::PredictAndTrain).unwrap_err();
        assert!(err.to_string().contains("missing required predict()"));
    }

    #[test]
    fn test_forbidden_extra_train() {
        let source =
            "def train_model(open_artifact):\n    pass\ndef predict(instance):\n    pass\n";
        let err = generate_model_file(source, Capability::Predict).unwrap_err();
        assert!(err.to_string().contains("train_model() function must not be defined"));
    }

    #[test]
    fn test_forbidden_extra_predict() {
        let source =
            "def train_model(open_artifact):\n    pass\ndef predict(instance):\n    pass\n";
        let err = generate_model_file(source, Capability::Train).unwrap_err();
        assert!(err.to_string().contains("predict() function must not be defined"));
    }

    #[test]
    fn test_validation_errors_propagate() {
        let source = "def train_model(open_artifact):\n    pass\n\
                      def train_model(open_artifact):\n    pass\n";
        let err = generate_model_file(source, Capability::Train).unwrap_err();
        assert!(err.to_string().contains("multiple definitions"));
    }
}

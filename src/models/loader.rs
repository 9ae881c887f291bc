//! Model file location and loading

use crate::error::{PredictError, PredictResult};
use crate::models::classifier::Classifier;
use crate::models::onnx::OnnxModel;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Where the model file lives.
///
/// Resolution: `model_directory/model_filename` when a directory is set,
/// otherwise `fallback_path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelLocation {
    pub model_directory: Option<PathBuf>,
    pub model_filename: String,
    pub fallback_path: PathBuf,
}

impl ModelLocation {
    pub fn new(
        model_directory: Option<PathBuf>,
        model_filename: impl Into<String>,
        fallback_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            model_directory,
            model_filename: model_filename.into(),
            fallback_path: fallback_path.into(),
        }
    }

    /// Location that always points at one file
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let model_filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            model_directory: None,
            model_filename,
            fallback_path: path,
        }
    }

    /// Path the model is read from
    pub fn resolve(&self) -> PathBuf {
        match &self.model_directory {
            Some(directory) => directory.join(&self.model_filename),
            None => self.fallback_path.clone(),
        }
    }
}

/// Reads a classifier from a resolved path
pub trait ModelLoader: Send + Sync {
    fn load(&self, path: &Path) -> PredictResult<Arc<dyn Classifier>>;
}

/// Loader for ONNX model files
#[derive(Debug, Default, Clone, Copy)]
pub struct OnnxModelLoader;

impl OnnxModelLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load and optimize a model without type-erasing it
    pub fn load_model(&self, path: &Path) -> PredictResult<OnnxModel> {
        let load_error = |reason: String| PredictError::ModelLoad {
            path: path.to_path_buf(),
            reason,
        };

        if !path.exists() {
            return Err(load_error("file not found".to_string()));
        }

        info!(path = %path.display(), "Loading ONNX model");

        let model = OnnxModel::load(path).map_err(|e| load_error(format!("{:#}", e)))?;

        info!(
            path = %path.display(),
            features = model.feature_names().len(),
            "Model loaded successfully"
        );

        Ok(model)
    }
}

impl ModelLoader for OnnxModelLoader {
    fn load(&self, path: &Path) -> PredictResult<Arc<dyn Classifier>> {
        Ok(Arc::new(self.load_model(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    #[test]
    fn test_resolve_prefers_directory() {
        let location = ModelLocation::new(
            Some(PathBuf::from("/srv/models")),
            "heart_disease_model.onnx",
            "heart_disease_model.onnx",
        );
        assert_eq!(
            location.resolve(),
            PathBuf::from("/srv/models/heart_disease_model.onnx")
        );
    }

    #[test]
    fn test_resolve_fallback() {
        let location = ModelLocation::new(None, "heart_disease_model.onnx", "local_model.onnx");
        assert_eq!(location.resolve(), PathBuf::from("local_model.onnx"));
    }

    #[test]
    fn test_file_location() {
        let location = ModelLocation::file("/tmp/model.onnx");
        assert_eq!(location.model_filename, "model.onnx");
        assert_eq!(location.resolve(), PathBuf::from("/tmp/model.onnx"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.onnx");

        match OnnxModelLoader::new().load(&path) {
            Err(PredictError::ModelLoad { path: failed, reason }) => {
                assert_eq!(failed, path);
                assert_eq!(reason, "file not found");
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_corrupt_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\x80\x04\x95 pickled, not onnx").unwrap();

        let err = OnnxModelLoader::new().load(file.path()).unwrap_err();
        assert!(matches!(err, PredictError::ModelLoad { .. }));
    }

    #[test]
    fn test_missing_feature_metadata() {
        let path = fixture("unlabeled_model.onnx");

        match OnnxModelLoader::new().load(&path) {
            Err(PredictError::ModelLoad { reason, .. }) => {
                assert!(reason.contains("feature_names"), "reason: {}", reason);
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_load_valid_file() {
        let model = OnnxModelLoader::new()
            .load(&fixture("heart_disease_model.onnx"))
            .unwrap();
        assert_eq!(model.feature_names().len(), 9);
        assert_eq!(model.feature_names()[0], "Age");
    }
}

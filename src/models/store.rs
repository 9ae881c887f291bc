//! Lazily loaded, process-wide model handle

use crate::error::PredictResult;
use crate::models::classifier::Classifier;
use crate::models::loader::{ModelLoader, ModelLocation, OnnxModelLoader};
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// A successfully loaded model and where it came from
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub model: Arc<dyn Classifier>,
    pub path: PathBuf,
    pub loaded_at: DateTime<Utc>,
    pub load_time: Duration,
}

/// Owns the model lifecycle: uninitialized until the first successful
/// [`ModelStore::ensure_loaded`], then loaded for the rest of the process.
///
/// Concurrent first callers block while one of them loads. A failed load
/// leaves the store uninitialized so the next caller tries again.
pub struct ModelStore {
    location: ModelLocation,
    loader: Arc<dyn ModelLoader>,
    cell: OnceCell<LoadedModel>,
}

impl ModelStore {
    /// Store reading ONNX models from `location`
    pub fn new(location: ModelLocation) -> Self {
        Self::with_loader(location, Arc::new(OnnxModelLoader::new()))
    }

    pub fn with_loader(location: ModelLocation, loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            location,
            loader,
            cell: OnceCell::new(),
        }
    }

    /// Load the model unless already loaded
    pub fn ensure_loaded(&self) -> PredictResult<&LoadedModel> {
        self.cell.get_or_try_init(|| {
            let path = self.location.resolve();
            let start = Instant::now();

            match self.loader.load(&path) {
                Ok(model) => {
                    let load_time = start.elapsed();
                    info!(
                        path = %path.display(),
                        load_time_us = load_time.as_micros() as u64,
                        "Model ready"
                    );
                    Ok(LoadedModel {
                        model,
                        path,
                        loaded_at: Utc::now(),
                        load_time,
                    })
                }
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Model load failed");
                    Err(e)
                }
            }
        })
    }

    /// Loaded model, without triggering a load
    pub fn get(&self) -> Option<&LoadedModel> {
        self.cell.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn location(&self) -> &ModelLocation {
        &self.location
    }
}

impl std::fmt::Debug for ModelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelStore")
            .field("location", &self.location)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

//! Model lifecycle and inference

pub mod classifier;
pub mod inference;
pub mod loader;
pub mod onnx;
pub mod store;

pub use classifier::Classifier;
pub use inference::InferenceEngine;
pub use loader::{ModelLoader, ModelLocation, OnnxModelLoader};
pub use onnx::OnnxModel;
pub use store::{LoadedModel, ModelStore};

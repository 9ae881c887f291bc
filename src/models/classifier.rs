//! Classifier abstraction shared by loaders and the inference engine

use crate::error::PredictResult;
use std::fmt::Debug;

/// A trained model as the service sees it: declared feature order plus a
/// scoring function over one row.
pub trait Classifier: Debug + Send + Sync {
    /// Feature names in the order `predict` expects them
    fn feature_names(&self) -> &[String];

    /// Score one row; the row must follow `feature_names()` order
    fn predict(&self, row: &[f64]) -> PredictResult<f64>;
}

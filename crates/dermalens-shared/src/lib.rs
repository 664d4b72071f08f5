//! # dermalens-shared
//!
//! Domain vocabulary for the dermalens client: typed identifiers, the photo
//! model, interpretation types, and the date-bucketed timeline shared between
//! the REST layer and the controller.

pub mod constants;
pub mod timeline;
pub mod types;

pub use timeline::{DateBucket, Timeline};
pub use types::{
    AnalysisRecord, ExecutionTimes, Interpretation, InterpretationHint, Photo, PhotoId,
    Prediction, PreprocessMode, PreprocessStrategy,
};

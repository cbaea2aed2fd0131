pub mod metrics;
pub mod sample;
pub mod validator;

pub use metrics::{ClassMetrics, ConfusionMatrix};
pub use sample::{load_samples, parse_samples, seed_samples, Prediction, ValidationSample};
pub use validator::{compute_report, AccuracyReport, AccuracyValidator};

// TruthSense Core Services

pub mod text_processor;
pub mod config_store;
pub mod detection;

pub use text_processor::*;
pub use config_store::*;

// Re-export detection module items
pub use detection::{
    analyze,
    classify,
    HeadlineClassifier,
    RuleError,
    RuleTable,
};

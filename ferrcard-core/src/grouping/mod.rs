pub mod conditions;
pub mod config;
pub mod engine;

pub use config::{GroupingConfig, GroupingConfigBuilder, ThresholdProfile};
pub use engine::group_by_condition;

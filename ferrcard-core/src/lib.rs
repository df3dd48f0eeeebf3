pub mod analysis;
pub mod arrange;
pub mod consts;
pub mod error;
pub mod grouping;
pub mod layout;
pub mod pipeline;

// Re-export commonly used types
pub use analysis::{bbox::Bbox, labels::ElementKind};
pub use arrange::generate_layout;
pub use error::LayoutError;
pub use grouping::{GroupingConfig, GroupingConfigBuilder, ThresholdProfile};
pub use layout::{
    element::{Element, ElementId},
    export::{LayoutNodeView, Properties},
    tree::{LayoutTree, NodeId, NodeKind},
};
pub use pipeline::{
    GeometryExtractor, LayoutPipeline, PropertyExtractor,
    merge::{CardLayout, merge_properties},
};

use snafu::prelude::*;

use crate::{analysis::bbox::Bbox, layout::element::ElementId};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum LayoutError {
    #[snafu(display("Element `{}` has an invalid bbox {:?}", id, bbox))]
    InvalidBox { id: ElementId, bbox: Bbox },
    #[snafu(display("Element `{}` appears more than once", id))]
    DuplicateElement { id: ElementId },
    #[snafu(display("Can not compute a bounding box over zero boxes"))]
    EmptyInput,
    #[snafu(display(
        "Property merge mismatch: {} element(s) without properties {:?}, {} property record(s) without element {:?}",
        missing_properties.len(),
        missing_properties,
        missing_layout.len(),
        missing_layout
    ))]
    PropertyMergeMismatch {
        missing_properties: Vec<ElementId>,
        missing_layout: Vec<ElementId>,
    },
    #[snafu(display("Property extraction error: {}", message))]
    PropertyExtraction { message: String },
    #[snafu(display("Layout task error: {}", source))]
    LayoutTask { source: tokio::task::JoinError },
    #[snafu(display("Parse `{}` error: {}", stage, source))]
    Json {
        source: serde_json::Error,
        stage: String,
    },
    #[snafu(display("Read `{}` error: {}", path, source))]
    IoRead {
        source: std::io::Error,
        path: String,
    },
}

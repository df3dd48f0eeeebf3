pub mod ingest;
pub mod merge;

use std::{collections::HashMap, sync::Arc};

use futures::future;
use serde_json::json;
use snafu::ResultExt;
use tracing::{debug, info, instrument};

use crate::{
    arrange::generate_layout,
    error::{LayoutError, LayoutTaskSnafu},
    grouping::config::GroupingConfig,
    layout::{
        element::{Element, ElementId},
        export::Properties,
    },
};

use self::{
    ingest::{Suppressed, suppress_overlaps, validate},
    merge::{CardLayout, merge_properties},
};

/// Produces one property record per element, keyed by element id.
pub trait PropertyExtractor {
    fn extract(
        &self,
        elements: Arc<[Element]>,
    ) -> impl Future<Output = Result<HashMap<ElementId, Properties>, LayoutError>> + Send;
}

/// Records what the detector already knows about every element.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeometryExtractor;

impl PropertyExtractor for GeometryExtractor {
    fn extract(
        &self,
        elements: Arc<[Element]>,
    ) -> impl Future<Output = Result<HashMap<ElementId, Properties>, LayoutError>> + Send {
        async move {
            let records = elements
                .iter()
                .map(|element| {
                    let mut record = Properties::new();
                    record.insert("kind".to_string(), json!(element.kind.name()));
                    record.insert("width".to_string(), json!(element.bbox.width()));
                    record.insert("height".to_string(), json!(element.bbox.height()));
                    if let Some(score) = element.score {
                        record.insert("score".to_string(), json!(score));
                    }
                    (element.id, record)
                })
                .collect();
            Ok(records)
        }
    }
}

/// Runs layout and property extraction for one card and joins the results.
pub struct LayoutPipeline<E> {
    config: GroupingConfig,
    extractor: E,
}

impl<E: PropertyExtractor> LayoutPipeline<E> {
    pub fn new(config: GroupingConfig, extractor: E) -> Self {
        Self { config, extractor }
    }

    /// Validates `elements`, then builds the layout on the blocking pool
    /// while the extractor runs, and merges both by element id.
    #[instrument(skip_all, fields(elements = elements.len()))]
    pub async fn predict(&self, elements: Vec<Element>) -> Result<CardLayout, LayoutError> {
        validate(&elements)?;

        let elements = if self.config.suppress_overlaps {
            let Suppressed { kept, dropped } = suppress_overlaps(elements, &self.config);
            if !dropped.is_empty() {
                info!("suppressed {} overlapping element(s)", dropped.len());
            }
            kept
        } else {
            elements
        };
        let elements: Arc<[Element]> = elements.into();

        let layout = {
            let elements = Arc::clone(&elements);
            let config = self.config.clone();
            async move {
                tokio::task::spawn_blocking(move || generate_layout(&elements, &config))
                    .await
                    .context(LayoutTaskSnafu)?
            }
        };

        let (tree, properties) =
            future::try_join(layout, self.extractor.extract(elements)).await?;
        debug!("merging {} property record(s)", properties.len());

        merge_properties(tree, properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::{bbox::Bbox, labels::ElementKind},
        error::PropertyExtractionSnafu,
        grouping::config::GroupingConfigBuilder,
    };

    fn element(id: u128, kind: ElementKind, bbox: [f32; 4]) -> Element {
        Element::new(kind, Bbox::from(bbox)).with_id(ElementId::from_u128(id))
    }

    fn card() -> Vec<Element> {
        vec![
            element(1, ElementKind::Textbox, [0.0, 0.0, 300.0, 20.0]),
            element(2, ElementKind::Image, [0.0, 100.0, 50.0, 150.0]),
            element(3, ElementKind::Image, [60.0, 102.0, 110.0, 152.0]),
        ]
    }

    /// Hands out a text record per element, leaving out `skip`.
    struct TextExtractor {
        skip: Option<ElementId>,
    }

    impl PropertyExtractor for TextExtractor {
        fn extract(
            &self,
            elements: Arc<[Element]>,
        ) -> impl Future<Output = Result<HashMap<ElementId, Properties>, LayoutError>> + Send
        {
            let skip = self.skip;
            async move {
                Ok(elements
                    .iter()
                    .filter(|element| Some(element.id) != skip)
                    .map(|element| {
                        let mut record = Properties::new();
                        record.insert("text".to_string(), json!(format!("element {}", element.id)));
                        (element.id, record)
                    })
                    .collect())
            }
        }
    }

    struct FailingExtractor;

    impl PropertyExtractor for FailingExtractor {
        fn extract(
            &self,
            _elements: Arc<[Element]>,
        ) -> impl Future<Output = Result<HashMap<ElementId, Properties>, LayoutError>> + Send
        {
            async move {
                PropertyExtractionSnafu {
                    message: "ocr backend unavailable",
                }
                .fail()
            }
        }
    }

    #[tokio::test]
    async fn test_predict_merges_properties() {
        let pipeline = LayoutPipeline::new(GroupingConfig::default(), GeometryExtractor);
        let card = pipeline.predict(card()).await.unwrap();

        assert_eq!(
            card.tree.debug_layout(),
            "item(1)\nimageset\n\titem(5)\n\titem(5)\n"
        );
        let nodes = serde_json::to_value(card.to_nodes()).unwrap();
        assert_eq!(nodes[0]["object"], "item");
        assert_eq!(nodes[0]["properties"]["kind"], "textbox");
        assert_eq!(nodes[1]["object"], "imageset");
        assert_eq!(nodes[1]["imageset"]["items"][1]["properties"]["width"], 50.0);
    }

    #[tokio::test]
    async fn test_predict_empty() {
        let pipeline = LayoutPipeline::new(GroupingConfig::default(), GeometryExtractor);
        let card = pipeline.predict(Vec::new()).await.unwrap();
        assert!(card.tree.is_empty());
        assert!(card.properties.is_empty());
    }

    #[tokio::test]
    async fn test_predict_reports_missing_properties() {
        let pipeline = LayoutPipeline::new(
            GroupingConfig::default(),
            TextExtractor {
                skip: Some(ElementId::from_u128(2)),
            },
        );
        let err = pipeline.predict(card()).await.unwrap_err();
        assert!(matches!(
            err,
            LayoutError::PropertyMergeMismatch { ref missing_properties, ref missing_layout }
                if missing_properties == &[ElementId::from_u128(2)] && missing_layout.is_empty()
        ));
    }

    #[tokio::test]
    async fn test_predict_propagates_extractor_failure() {
        let pipeline = LayoutPipeline::new(GroupingConfig::default(), FailingExtractor);
        let err = pipeline.predict(card()).await.unwrap_err();
        assert!(matches!(err, LayoutError::PropertyExtraction { .. }));
    }

    #[tokio::test]
    async fn test_predict_rejects_invalid_input() {
        let pipeline = LayoutPipeline::new(GroupingConfig::default(), TextExtractor { skip: None });
        let mut elements = card();
        elements.push(element(9, ElementKind::Textbox, [10.0, 10.0, 5.0, 20.0]));
        let err = pipeline.predict(elements).await.unwrap_err();
        assert!(matches!(err, LayoutError::InvalidBox { .. }));
    }

    #[tokio::test]
    async fn test_predict_suppresses_overlaps_when_enabled() {
        let config = GroupingConfigBuilder::default()
            .suppress_overlaps(true)
            .build()
            .unwrap();
        let pipeline = LayoutPipeline::new(config, TextExtractor { skip: None });
        let elements = vec![
            element(1, ElementKind::Textbox, [0.0, 0.0, 100.0, 20.0]).with_score(0.9),
            element(2, ElementKind::Textbox, [1.0, 0.0, 100.0, 21.0]).with_score(0.3),
        ];

        let card = pipeline.predict(elements).await.unwrap();
        let ids: Vec<ElementId> = card.tree.elements().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![ElementId::from_u128(1)]);
        assert_eq!(card.properties.len(), 1);
    }
}

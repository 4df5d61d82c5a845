use crate::core::{OrderRecord, Pipeline};
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting order extraction");

        let record = self.extract_and_transform().await?;

        tracing::info!("💾 Loading record...");
        let output_path = self.pipeline.load(record).await?;
        tracing::info!("📁 Output saved to: {}", output_path);

        Ok(output_path)
    }

    /// Dry run: extract and transform, but write nothing.
    pub async fn preview(&self) -> Result<OrderRecord> {
        tracing::info!("🔍 Previewing order extraction (dry run)");
        self.extract_and_transform().await
    }

    async fn extract_and_transform(&self) -> Result<OrderRecord> {
        tracing::info!("📥 Extracting document...");
        let document = self.pipeline.extract().await?;
        tracing::info!("Read {} ({} bytes)", document.source, document.content.len());

        tracing::info!("🔄 Transforming document...");
        let record = self.pipeline.transform(document).await?;
        let legs: usize = record
            .result
            .trips
            .iter()
            .map(|trip| trip.details.round_trips.len())
            .sum();
        tracing::info!(
            "Extracted {} trips, {} round trips, {} prices",
            record.result.trips.len(),
            legs,
            record.result.custom.prices.len()
        );

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RawDocument;
    use crate::utils::error::EtlError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingPipeline {
        loads: AtomicUsize,
        fail_transform: bool,
    }

    #[async_trait::async_trait]
    impl Pipeline for CountingPipeline {
        async fn extract(&self) -> Result<RawDocument> {
            Ok(RawDocument {
                source: "memory".to_string(),
                content: String::new(),
            })
        }

        async fn transform(&self, _document: RawDocument) -> Result<OrderRecord> {
            if self.fail_transform {
                return Err(EtlError::ValidationError {
                    message: "rejected".to_string(),
                });
            }
            Ok(OrderRecord::ok(vec![], vec![]))
        }

        async fn load(&self, _record: OrderRecord) -> Result<String> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok("out.json".to_string())
        }
    }

    #[tokio::test]
    async fn test_run_loads_once() {
        let engine = EtlEngine::new(CountingPipeline::default());

        let path = engine.run().await.unwrap();
        assert_eq!(path, "out.json");
        assert_eq!(engine.pipeline().loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_preview_skips_load() {
        let engine = EtlEngine::new(CountingPipeline::default());

        let record = engine.preview().await.unwrap();
        assert_eq!(record.status, "ok");
        assert_eq!(engine.pipeline().loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transform_error_stops_run() {
        let engine = EtlEngine::new(CountingPipeline {
            fail_transform: true,
            ..Default::default()
        });

        assert!(engine.run().await.is_err());
        assert_eq!(engine.pipeline().loads.load(Ordering::SeqCst), 0);
    }
}

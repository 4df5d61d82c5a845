use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{OrderRecord, RawDocument};
use crate::extract::assembler::OrderAssembler;
use crate::utils::error::Result;
use crate::utils::validation::Validate;

/// Reads one order confirmation, extracts the record, writes it as JSON.
pub struct OrderPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    assembler: OrderAssembler,
}

impl<S: Storage, C: ConfigProvider> OrderPipeline<S, C> {
    /// Fails only when a configured selector does not compile.
    pub fn new(storage: S, config: C) -> Result<Self> {
        let assembler = OrderAssembler::from_selectors(&config.selectors(), config.leg_policy())?;
        Ok(Self {
            storage,
            config,
            assembler,
        })
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    fn encode(&self, record: &OrderRecord) -> Result<Vec<u8>> {
        let json = if self.config.pretty_output() {
            serde_json::to_vec_pretty(record)?
        } else {
            serde_json::to_vec(record)?
        };
        Ok(json)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for OrderPipeline<S, C> {
    async fn extract(&self) -> Result<RawDocument> {
        let source = self.config.input_path();
        tracing::debug!("Reading order document from: {}", source);

        let bytes = self.storage.read_file(source).await?;
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Input is not valid UTF-8, replacing invalid sequences");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        tracing::debug!("Read {} bytes", content.len());
        Ok(RawDocument {
            source: source.to_string(),
            content,
        })
    }

    async fn transform(&self, document: RawDocument) -> Result<OrderRecord> {
        let record = self.assembler.assemble_markup(&document.content);

        if self.config.strict() {
            tracing::debug!("Strict mode: validating record from {}", document.source);
            record.validate()?;
        }

        Ok(record)
    }

    async fn load(&self, record: OrderRecord) -> Result<String> {
        let output_path = self.config.output_path();
        let data = self.encode(&record)?;

        tracing::debug!("Writing {} bytes to storage", data.len());
        self.storage.write_file(output_path, &data).await?;

        Ok(output_path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::dialect::DialectSelectors;
    use crate::extract::policy::LegPolicy;
    use crate::utils::error::EtlError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    const ORDER: &str = concat!(
        r#"<td class="pnr-ref"><span class="pnr-info"> SNIKXP </span></td>"#,
        r#"<td class="pnr-name"><span class="pnr-info"> DUPONT </span></td>"#,
        r#"<table class="total-amount"><tbody><tr><td>Total</td><td> 768,50 € </td></tr></tbody></table>"#,
    );

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, data: &[u8]) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), data.to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        pretty: bool,
        strict: bool,
        selectors: DialectSelectors,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                pretty: false,
                strict: false,
                selectors: DialectSelectors::default(),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            "order.html"
        }

        fn output_path(&self) -> &str {
            "result.json"
        }

        fn pretty_output(&self) -> bool {
            self.pretty
        }

        fn strict(&self) -> bool {
            self.strict
        }

        fn selectors(&self) -> DialectSelectors {
            self.selectors.clone()
        }

        fn leg_policy(&self) -> LegPolicy {
            LegPolicy::default()
        }
    }

    #[tokio::test]
    async fn test_extract_reads_configured_input() {
        let storage = MockStorage::with_file("order.html", ORDER.as_bytes());
        let pipeline = OrderPipeline::new(storage, MockConfig::new()).unwrap();

        let document = pipeline.extract().await.unwrap();
        assert_eq!(document.source, "order.html");
        assert_eq!(document.content, ORDER);
    }

    #[tokio::test]
    async fn test_extract_replaces_invalid_utf8() {
        let storage = MockStorage::with_file("order.html", b"<p>caf\xe9</p>");
        let pipeline = OrderPipeline::new(storage, MockConfig::new()).unwrap();

        let document = pipeline.extract().await.unwrap();
        assert_eq!(document.content, "<p>caf\u{fffd}</p>");
    }

    #[tokio::test]
    async fn test_extract_missing_file_is_io_error() {
        let storage = MockStorage::with_file("other.html", b"");
        let pipeline = OrderPipeline::new(storage, MockConfig::new()).unwrap();

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, EtlError::IoError(_)));
    }

    #[tokio::test]
    async fn test_transform_and_load_compact_json() {
        let storage = MockStorage::with_file("order.html", ORDER.as_bytes());
        let pipeline = OrderPipeline::new(storage.clone(), MockConfig::new()).unwrap();

        let document = pipeline.extract().await.unwrap();
        let record = pipeline.transform(document).await.unwrap();
        assert_eq!(record.result.trips[0].code, "SNIKXP");

        let path = pipeline.load(record).await.unwrap();
        assert_eq!(path, "result.json");

        let written = String::from_utf8(storage.get_file("result.json").await.unwrap()).unwrap();
        assert!(written.starts_with(r#"{"status":"ok","result":{"trips":[{"code":"SNIKXP""#));
        assert!(written.contains(r#""price":768.5"#));
        assert!(!written.contains('\n'));
    }

    #[tokio::test]
    async fn test_pretty_output() {
        let storage = MockStorage::with_file("order.html", ORDER.as_bytes());
        let mut config = MockConfig::new();
        config.pretty = true;
        let pipeline = OrderPipeline::new(storage.clone(), config).unwrap();

        let document = pipeline.extract().await.unwrap();
        let record = pipeline.transform(document).await.unwrap();
        pipeline.load(record).await.unwrap();

        let written = String::from_utf8(storage.get_file("result.json").await.unwrap()).unwrap();
        assert!(written.contains("\n  \"status\": \"ok\""));
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_incomplete_record() {
        let storage = MockStorage::with_file("order.html", ORDER.as_bytes());
        let mut config = MockConfig::new();
        config.strict = true;
        let pipeline = OrderPipeline::new(storage, config).unwrap();

        let document = pipeline.extract().await.unwrap();
        let err = pipeline.transform(document).await.unwrap_err();
        assert!(matches!(err, EtlError::ValidationError { .. }));
    }

    #[test]
    fn test_invalid_selector_fails_construction() {
        let mut config = MockConfig::new();
        config.selectors.trip_code = "td.".to_string();

        let result = OrderPipeline::new(MockStorage::with_file("order.html", b""), config);
        assert!(matches!(result, Err(EtlError::InvalidSelector(_))));
    }
}

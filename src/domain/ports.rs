use crate::domain::model::{OrderRecord, RawDocument};
use crate::extract::dialect::DialectSelectors;
use crate::extract::policy::LegPolicy;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn pretty_output(&self) -> bool;
    fn strict(&self) -> bool;
    fn selectors(&self) -> DialectSelectors;
    fn leg_policy(&self) -> LegPolicy;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RawDocument>;
    async fn transform(&self, document: RawDocument) -> Result<OrderRecord>;
    async fn load(&self, record: OrderRecord) -> Result<String>;
}

use crate::domain::model::{ReportBundle, ReportFormat, RouteOffers, RouteQuery, Traveler};
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
    fn api_endpoint(&self) -> &str;
    /// Directory to write the report into; `None` sends it to stdout.
    fn output_path(&self) -> Option<&str>;
    fn routes(&self) -> &[RouteQuery];
    fn travelers(&self) -> &[Traveler];
    fn format(&self) -> ReportFormat;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RouteOffers>>;
    async fn transform(&self, data: Vec<RouteOffers>) -> Result<ReportBundle>;
    async fn load(&self, result: ReportBundle) -> Result<String>;
}

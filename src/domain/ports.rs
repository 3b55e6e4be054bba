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

/// Language-model boundary: one templated request, one text response.
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    async fn generate(&self, destination: &str, dates: &str, budget: f64) -> Result<String>;
}

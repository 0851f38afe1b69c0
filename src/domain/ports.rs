use crate::domain::model::{Parameters, UploadPayload};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Executes dispatched requests against the Jiandaoyun API. Owns
/// authentication injection; an embedding host runtime supplies its own
/// implementation, the crate ships a reqwest adapter.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, endpoint: &str, body: &Value) -> Result<Value>;

    async fn upload(&self, url: &str, payload: &UploadPayload) -> Result<Value>;
}

/// Resolves the parameter bag for an input item. In a workflow host this is
/// where per-item expression evaluation happens; standalone runs use
/// [`StaticParameters`].
pub trait ParameterProvider: Send + Sync {
    fn parameters(&self, item_index: usize) -> Result<Parameters>;
}

/// Same parameter values for every item.
#[derive(Debug, Clone, Default)]
pub struct StaticParameters(pub Parameters);

impl ParameterProvider for StaticParameters {
    fn parameters(&self, _item_index: usize) -> Result<Parameters> {
        Ok(self.0.clone())
    }
}

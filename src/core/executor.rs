use serde_json::Value;

use crate::core::dispatch::build_request;
use crate::domain::model::{Item, Operation, Resource, UploadPayload, UploadSpec};
use crate::domain::ports::{ParameterProvider, Transport};
use crate::utils::error::{ConnectorError, Result};

/// Runs one resource/operation selection over the host's item list.
///
/// Items are processed sequentially. A failure either becomes that item's
/// output (`continue_on_fail`) or aborts the whole batch; there is no retry.
pub struct NodeRunner<T, P> {
    resource: Resource,
    operation: Operation,
    transport: T,
    parameters: P,
    continue_on_fail: bool,
}

impl<T: Transport, P: ParameterProvider> NodeRunner<T, P> {
    pub fn new(resource: Resource, operation: Operation, transport: T, parameters: P) -> Self {
        Self {
            resource,
            operation,
            transport,
            parameters,
            continue_on_fail: false,
        }
    }

    pub fn continue_on_fail(mut self, enabled: bool) -> Self {
        self.continue_on_fail = enabled;
        self
    }

    pub async fn run(&self, items: &[Item]) -> Result<Vec<Item>> {
        let mut output = Vec::new();

        for (index, item) in items.iter().enumerate() {
            match self.run_item(index, item).await {
                Ok(mut produced) => output.append(&mut produced),
                Err(error) if self.continue_on_fail => {
                    tracing::warn!("Item {} failed: {}", index, error);
                    output.push(Item::error_output(error.to_string(), index));
                }
                Err(error) => return Err(error),
            }
        }

        tracing::info!(
            "{}:{} processed {} item(s) into {} output item(s)",
            self.resource,
            self.operation,
            items.len(),
            output.len()
        );
        Ok(output)
    }

    async fn run_item(&self, index: usize, item: &Item) -> Result<Vec<Item>> {
        let params = self.parameters.parameters(index)?;
        let request = build_request(self.resource, self.operation, &params)?;
        tracing::debug!(endpoint = %request.endpoint, item = index, "dispatching request");

        let response = match &request.upload {
            Some(spec) => {
                let payload = resolve_upload(item, spec)?;
                self.transport.upload(&request.endpoint, &payload).await?
            }
            None => {
                self.transport
                    .post_json(&request.endpoint, &request.body)
                    .await?
            }
        };

        Ok(fan_out(response, index))
    }
}

fn resolve_upload(item: &Item, spec: &UploadSpec) -> Result<UploadPayload> {
    let binary = item.binary.get(&spec.binary_property).ok_or_else(|| {
        ConnectorError::validation(
            "binaryPropertyName",
            format!(
                "input item has no binary property \"{}\"",
                spec.binary_property
            ),
        )
    })?;
    Ok(UploadPayload {
        token: spec.token.clone(),
        bytes: binary.decode()?,
        file_name: binary.file_name.clone(),
        mime_type: binary.mime_type.clone(),
    })
}

/// Array responses fan out into one output item per element, all paired to
/// the source item; anything else maps 1:1.
fn fan_out(response: Value, source_index: usize) -> Vec<Item> {
    match response {
        Value::Array(values) => values
            .into_iter()
            .map(|value| Item::new(value).paired_with(source_index))
            .collect(),
        other => vec![Item::new(other).paired_with(source_index)],
    }
}

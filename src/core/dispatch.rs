use serde_json::{json, Map, Value};

use crate::domain::model::{ApiRequest, Operation, Parameters, Resource};
use crate::utils::error::{ConnectorError, Result};
use crate::utils::validation::{parse_json_array_field, parse_json_field, validate_url};

/// Maps a resource/operation selection plus the resolved parameters to the
/// API call to perform. Pure; transport and binary resolution happen later.
pub fn build_request(
    resource: Resource,
    operation: Operation,
    params: &Parameters,
) -> Result<ApiRequest> {
    let app_id = params.get_str("appId", "");
    let entry_id = params.get_str("entryId", "");
    let skip = params.get_u64("skipCount", 0);
    let limit = params.get_u64("returnCount", 100);
    let additional = params.get_object("additionalFields");

    match (resource, operation) {
        (Resource::App, Operation::GetApps) => Ok(ApiRequest::post(
            "/api/v5/app/list",
            json!({ "skip": skip, "limit": limit }),
        )),
        (Resource::App, Operation::GetEntries) => Ok(ApiRequest::post(
            "/api/v5/app/entry/list",
            json!({ "app_id": app_id, "skip": skip, "limit": limit }),
        )),

        (Resource::Entry, Operation::GetFields) => Ok(ApiRequest::post(
            "/api/v5/app/entry/widget/list",
            json!({ "app_id": app_id, "entry_id": entry_id }),
        )),

        (Resource::Data, Operation::GetSingleDataRecord) => Ok(ApiRequest::post(
            "/api/v5/app/entry/data/get",
            json!({
                "app_id": app_id,
                "entry_id": entry_id,
                "data_id": params.get_str("dataId", ""),
            }),
        )),
        (Resource::Data, Operation::GetManyDataRecords) => {
            let mut body = base_body(&app_id, &entry_id);
            // data_id is the pagination cursor: the last record of the
            // previous page, absent on the first page
            copy_present(&mut body, &additional, &[("dataId", "data_id"), ("fields", "fields")]);
            let filter_raw = additional.get_str("filter", "");
            let filter = if filter_raw.trim().is_empty() {
                json!({ "rel": "and", "cond": [] })
            } else {
                parse_json_field("filter", &filter_raw)?
            };
            body.insert("filter".to_string(), filter);
            body.insert("limit".to_string(), json!(limit));
            Ok(ApiRequest::post("/api/v5/app/entry/data/list", Value::Object(body)))
        }
        (Resource::Data, Operation::CreateDataRecord) => {
            ensure_json_input(resource, operation, params)?;
            let mut body = base_body(&app_id, &entry_id);
            body.insert(
                "data".to_string(),
                parse_json_field("dataRecordJson", &params.get_str("dataRecordJson", ""))?,
            );
            copy_present(
                &mut body,
                &additional,
                &[
                    ("dataCreator", "data_creator"),
                    ("isStartWorkflow", "is_start_workflow"),
                    ("isStartTrigger", "is_start_trigger"),
                    ("transactionId", "transaction_id"),
                ],
            );
            Ok(ApiRequest::post("/api/v5/app/entry/data/create", Value::Object(body)))
        }
        (Resource::Data, Operation::CreateManyDataRecords) => {
            let mut body = base_body(&app_id, &entry_id);
            body.insert(
                "data_list".to_string(),
                parse_json_array_field("dataRecordJson", &params.get_str("dataRecordJson", ""))?,
            );
            copy_present(
                &mut body,
                &additional,
                &[
                    ("dataCreator", "data_creator"),
                    ("isStartWorkflow", "is_start_workflow"),
                    ("transactionId", "transaction_id"),
                ],
            );
            Ok(ApiRequest::post(
                "/api/v5/app/entry/data/batch_create",
                Value::Object(body),
            ))
        }
        (Resource::Data, Operation::UpdateDataRecord) => {
            ensure_json_input(resource, operation, params)?;
            let mut body = base_body(&app_id, &entry_id);
            body.insert("data_id".to_string(), json!(params.get_str("dataId", "")));
            body.insert(
                "data".to_string(),
                parse_json_field("dataRecordJson", &params.get_str("dataRecordJson", ""))?,
            );
            copy_present(
                &mut body,
                &additional,
                &[
                    ("isStartTrigger", "is_start_trigger"),
                    ("transactionId", "transaction_id"),
                ],
            );
            Ok(ApiRequest::post("/api/v5/app/entry/data/update", Value::Object(body)))
        }
        (Resource::Data, Operation::UpdateManyDataRecords) => {
            ensure_json_input(resource, operation, params)?;
            let mut body = base_body(&app_id, &entry_id);
            body.insert(
                "data_ids".to_string(),
                parse_json_array_field(
                    "dataRecordIdsJson",
                    &params.get_str("dataRecordIdsJson", ""),
                )?,
            );
            body.insert(
                "data".to_string(),
                parse_json_field("dataRecordJson", &params.get_str("dataRecordJson", ""))?,
            );
            copy_present(&mut body, &additional, &[("transactionId", "transaction_id")]);
            Ok(ApiRequest::post(
                "/api/v5/app/entry/data/batch_update",
                Value::Object(body),
            ))
        }
        (Resource::Data, Operation::DeleteDataRecord) => {
            let mut body = base_body(&app_id, &entry_id);
            body.insert("data_id".to_string(), json!(params.get_str("dataId", "")));
            copy_present(&mut body, &additional, &[("isStartTrigger", "is_start_trigger")]);
            Ok(ApiRequest::post("/api/v5/app/entry/data/delete", Value::Object(body)))
        }
        (Resource::Data, Operation::DeleteManyDataRecord) => {
            let mut body = base_body(&app_id, &entry_id);
            body.insert(
                "data_ids".to_string(),
                parse_json_array_field(
                    "dataRecordIdsJson",
                    &params.get_str("dataRecordIdsJson", ""),
                )?,
            );
            Ok(ApiRequest::post(
                "/api/v5/app/entry/data/batch_delete",
                Value::Object(body),
            ))
        }

        (Resource::File, Operation::GetUploadToken) => Ok(ApiRequest::post(
            "/api/v5/app/entry/file/get_upload_token",
            json!({
                "app_id": app_id,
                "entry_id": entry_id,
                "transaction_id": params.get_str("transactionId", ""),
            }),
        )),
        (Resource::File, Operation::UploadFile) => {
            let url = params.get_str("url", "");
            validate_url("url", &url)?;
            Ok(ApiRequest::multipart(
                url,
                params.get_str("token", ""),
                params.get_str("binaryPropertyName", "data"),
            ))
        }

        (Resource::Workflow, Operation::GetWorkflowInstance) => Ok(ApiRequest::post(
            "/api/v6/workflow/instance/get",
            json!({
                "app_id": app_id,
                "entry_id": entry_id,
                "instance_id": params.get_str("instanceId", ""),
                "tasks_type": if params.get_bool("returnTasks", false) { 1 } else { 0 },
            }),
        )),
        (Resource::Workflow, Operation::GetWorkflowTasks) => Ok(ApiRequest::post(
            "/api/v5/workflow/task/list",
            json!({
                "username": params.get_str("username", ""),
                "skip": skip,
                "limit": limit,
            }),
        )),
        (Resource::Workflow, Operation::SubmitWorkflowTask) => {
            let mut body = Map::new();
            body.insert("username".to_string(), json!(params.get_str("username", "")));
            body.insert(
                "instance_id".to_string(),
                json!(params.get_str("instanceId", "")),
            );
            body.insert("task_id".to_string(), json!(params.get_str("taskId", "")));
            let comment = params.get_str("comment", "");
            if !comment.is_empty() {
                body.insert("comment".to_string(), json!(comment));
            }
            Ok(ApiRequest::post("/api/v1/workflow/task/approve", Value::Object(body)))
        }

        _ => Err(ConnectorError::not_implemented(resource, operation)),
    }
}

fn base_body(app_id: &str, entry_id: &str) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("app_id".to_string(), json!(app_id));
    body.insert("entry_id".to_string(), json!(entry_id));
    body
}

/// Copies additional-field values into the body under their snake_case wire
/// names. Presence decides emission: a present `false` is sent, an absent key
/// is not.
fn copy_present(body: &mut Map<String, Value>, source: &Parameters, pairs: &[(&str, &str)]) {
    for (param, field) in pairs {
        if let Some(value) = source.get(param) {
            body.insert((*field).to_string(), value.clone());
        }
    }
}

// 結構化欄位映射模式還沒做，目前只支援 JSON 輸入
fn ensure_json_input(resource: Resource, operation: Operation, params: &Parameters) -> Result<()> {
    if params.get_bool("usingJson", true) {
        Ok(())
    } else {
        Err(ConnectorError::not_implemented(resource, operation))
    }
}

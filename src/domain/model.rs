use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::utils::error::{ConnectorError, Result};
use crate::utils::validation::{self, Validate};

pub const DEFAULT_SERVER: &str = "https://api.jiandaoyun.com/";

/// Top-level entity group targeted by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    App,
    Entry,
    Data,
    File,
    Workflow,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::App => "app",
            Resource::Entry => "entry",
            Resource::Data => "data",
            Resource::File => "file",
            Resource::Workflow => "workflow",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "app" => Ok(Resource::App),
            "entry" => Ok(Resource::Entry),
            "data" => Ok(Resource::Data),
            "file" => Ok(Resource::File),
            "workflow" => Ok(Resource::Workflow),
            other => Err(ConnectorError::validation(
                "resource",
                format!("unknown resource \"{}\"", other),
            )),
        }
    }
}

/// The specific API action performed on a resource.
///
/// The serialized values are the wire names persisted in saved workflows, so
/// they stay camelCase (including the historical singular
/// `deleteManyDataRecord`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    GetApps,
    GetEntries,
    GetFields,
    GetSingleDataRecord,
    GetManyDataRecords,
    CreateDataRecord,
    CreateManyDataRecords,
    UpdateDataRecord,
    UpdateManyDataRecords,
    DeleteDataRecord,
    DeleteManyDataRecord,
    GetUploadToken,
    UploadFile,
    GetWorkflowInstance,
    GetWorkflowTasks,
    SubmitWorkflowTask,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetApps => "getApps",
            Operation::GetEntries => "getEntries",
            Operation::GetFields => "getFields",
            Operation::GetSingleDataRecord => "getSingleDataRecord",
            Operation::GetManyDataRecords => "getManyDataRecords",
            Operation::CreateDataRecord => "createDataRecord",
            Operation::CreateManyDataRecords => "createManyDataRecords",
            Operation::UpdateDataRecord => "updateDataRecord",
            Operation::UpdateManyDataRecords => "updateManyDataRecords",
            Operation::DeleteDataRecord => "deleteDataRecord",
            Operation::DeleteManyDataRecord => "deleteManyDataRecord",
            Operation::GetUploadToken => "getUploadToken",
            Operation::UploadFile => "uploadFile",
            Operation::GetWorkflowInstance => "getWorkflowInstance",
            Operation::GetWorkflowTasks => "getWorkflowTasks",
            Operation::SubmitWorkflowTask => "submitWorkflowTask",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self> {
        serde_json::from_value(Value::String(s.to_string())).map_err(|_| {
            ConnectorError::validation("operation", format!("unknown operation \"{}\"", s))
        })
    }
}

/// Per-item parameter bag, resolved by the host for each input item.
///
/// Values arrive as JSON; the typed accessors apply the same defaulting the
/// host's parameter resolution does. A JSON `null` counts as an absent key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters(Map<String, Value>);

impl Parameters {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ConnectorError::validation(
                "parameters",
                format!("must be a JSON object, got {}", json_type_name(&other)),
            )),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get_str(&self, name: &str, default: &str) -> String {
        match self.get(name) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => default.to_string(),
        }
    }

    pub fn get_u64(&self, name: &str, default: u64) -> u64 {
        match self.get(name) {
            Some(Value::Number(n)) => n.as_u64().unwrap_or(default),
            Some(Value::String(s)) => s.parse().unwrap_or(default),
            _ => default,
        }
    }

    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        match self.get(name) {
            Some(Value::Bool(b)) => *b,
            _ => default,
        }
    }

    /// Nested collection parameter ("additional fields"); empty when absent.
    pub fn get_object(&self, name: &str) -> Parameters {
        match self.get(name) {
            Some(Value::Object(map)) => Parameters(map.clone()),
            _ => Parameters::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A named binary attachment on an item, base64-encoded the way the host
/// stores binary data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryPayload {
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl BinaryPayload {
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| ConnectorError::validation("binary", format!("invalid base64 data: {}", e)))
    }
}

/// One element of the host's item list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub json: Value,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub binary: HashMap<String, BinaryPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paired_item: Option<usize>,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            json: Value::Object(Map::new()),
            binary: HashMap::new(),
            paired_item: None,
        }
    }
}

impl Item {
    pub fn new(json: Value) -> Self {
        Self {
            json,
            ..Self::default()
        }
    }

    pub fn paired_with(mut self, index: usize) -> Self {
        self.paired_item = Some(index);
        self
    }

    /// Continue-on-fail output for a failed input item.
    pub fn error_output(message: impl Into<String>, index: usize) -> Self {
        Self::new(serde_json::json!({ "error": message.into() })).paired_with(index)
    }
}

/// Multipart upload details carried by a `file:uploadFile` request. The bytes
/// come out of the input item's named binary property at execution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSpec {
    pub token: String,
    pub binary_property: String,
}

/// A resolved upload: token plus the decoded file bytes.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    pub token: String,
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

/// A dispatched API call. The Jiandaoyun open API is POST-only; `endpoint` is
/// a path on the credential server, or an absolute URL for file uploads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    pub endpoint: String,
    pub body: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload: Option<UploadSpec>,
}

impl ApiRequest {
    pub fn post(endpoint: impl Into<String>, body: Value) -> Self {
        Self {
            endpoint: endpoint.into(),
            body,
            upload: None,
        }
    }

    pub fn multipart(url: impl Into<String>, token: String, binary_property: String) -> Self {
        Self {
            endpoint: url.into(),
            body: Value::Object(Map::new()),
            upload: Some(UploadSpec {
                token,
                binary_property,
            }),
        }
    }
}

/// Connection credential: OpenAPI server plus the bearer API key.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credential {
    pub server: String,
    pub api_key: String,
}

impl Credential {
    pub fn new(server: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            api_key: api_key.into(),
        }
    }
}

impl fmt::Debug for Credential {
    // api_key is password-typed credential data; keep it out of logs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("server", &self.server)
            .field("api_key", &"***")
            .finish()
    }
}

impl Validate for Credential {
    fn validate(&self) -> Result<()> {
        validation::validate_url("connection.server", &self.server)?;
        validation::validate_non_empty_string("connection.api_key", &self.api_key)?;
        Ok(())
    }
}

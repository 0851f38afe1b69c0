//! Declarative definition of the Jiandaoyun node and credential: the
//! properties a host renders, their visibility rules, and the credential
//! test request. Runtime behavior lives in `dispatch` and `executor`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::model::{ApiRequest, Operation, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyKind {
    String,
    Number,
    Boolean,
    Json,
    Options,
    MultiOptions,
    Collection,
}

/// Visibility conditions on a declared property.
///
/// `show` requires every listed parameter's current value to be in its list;
/// `hide` hides on any match and wins over `show`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayOptions {
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub show: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub hide: Map<String, Value>,
}

impl DisplayOptions {
    pub fn show_when(mut self, name: &str, values: Value) -> Self {
        self.show.insert(name.to_string(), values);
        self
    }

    pub fn hide_when(mut self, name: &str, values: Value) -> Self {
        self.hide.insert(name.to_string(), values);
        self
    }

    pub fn is_visible(&self, current: &Map<String, Value>) -> bool {
        for (key, hidden) in &self.hide {
            if let (Some(value), Some(list)) = (current.get(key), hidden.as_array()) {
                if list.contains(value) {
                    return false;
                }
            }
        }
        for (key, allowed) in &self.show {
            match (current.get(key), allowed.as_array()) {
                (Some(value), Some(list)) if list.contains(value) => {}
                _ => return false,
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypeOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_precision: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_options_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_options_depends_on: Option<Vec<String>>,
}

/// A selectable value in an `options`/`multiOptions` property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub name: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl Choice {
    pub fn new(name: &str, value: impl Into<Value>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
            description: None,
            action: None,
        }
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    pub fn action(mut self, text: &str) -> Self {
        self.action = Some(text.to_string());
        self
    }
}

/// `options` entries are flat choices for selector kinds and nested
/// properties for collections, matching the host's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyOption {
    Choice(Choice),
    Nested(Box<Property>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub display_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropertyKind,
    #[serde(default)]
    pub default: Value,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_options: Option<DisplayOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_options: Option<TypeOptions>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<PropertyOption>,
}

impl Property {
    pub fn new(display_name: &str, name: &str, kind: PropertyKind) -> Self {
        Self {
            display_name: display_name.to_string(),
            name: name.to_string(),
            kind,
            default: Value::Null,
            required: false,
            description: None,
            display_options: None,
            type_options: None,
            options: Vec::new(),
        }
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = value;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    pub fn display(mut self, display_options: DisplayOptions) -> Self {
        self.display_options = Some(display_options);
        self
    }

    pub fn type_options(mut self, type_options: TypeOptions) -> Self {
        self.type_options = Some(type_options);
        self
    }

    pub fn choices(mut self, choices: Vec<Choice>) -> Self {
        self.options = choices.into_iter().map(PropertyOption::Choice).collect();
        self
    }

    pub fn children(mut self, children: Vec<Property>) -> Self {
        self.options = children
            .into_iter()
            .map(|p| PropertyOption::Nested(Box::new(p)))
            .collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRef {
    pub name: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    pub display_name: String,
    pub name: String,
    pub group: Vec<String>,
    pub version: u32,
    pub description: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub credentials: Vec<CredentialRef>,
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDescriptor {
    pub name: String,
    pub display_name: String,
    pub documentation_url: String,
    pub properties: Vec<Property>,
}

pub const CREDENTIAL_NAME: &str = "jiandaoyunApi";

fn show(entries: &[(&str, Value)]) -> DisplayOptions {
    entries
        .iter()
        .fold(DisplayOptions::default(), |opts, (name, values)| {
            opts.show_when(name, values.clone())
        })
}

fn hide(entries: &[(&str, Value)]) -> DisplayOptions {
    entries
        .iter()
        .fold(DisplayOptions::default(), |opts, (name, values)| {
            opts.hide_when(name, values.clone())
        })
}

/// Pagination parameters for the list operations. `returnCount` caps a single
/// request at 100 records; cursor-paged operations drop `skipCount`.
fn pagination_properties(display_options: DisplayOptions, with_skip: bool) -> Vec<Property> {
    let mut properties = vec![
        Property::new("Return Count", "returnCount", PropertyKind::Number)
            .default_value(json!(100))
            .description("The number of records to be retrieved in a single request")
            .type_options(TypeOptions {
                min_value: Some(1),
                max_value: Some(100),
                number_precision: Some(0),
                ..TypeOptions::default()
            })
            .display(display_options.clone()),
    ];
    if with_skip {
        properties.push(
            Property::new("Skip Count", "skipCount", PropertyKind::Number)
                .default_value(json!(0))
                .description("The number of records to be skipped")
                .type_options(TypeOptions {
                    min_value: Some(0),
                    ..TypeOptions::default()
                })
                .display(display_options),
        );
    }
    properties
}

fn operation_selector(resource: Resource, default: &str, choices: Vec<Choice>) -> Property {
    Property::new("Operation", "operation", PropertyKind::Options)
        .default_value(json!(default))
        .display(show(&[("resource", json!([resource.as_str()]))]))
        .choices(choices)
}

pub fn node_descriptor() -> NodeDescriptor {
    let mut properties = vec![
        Property::new("Resource", "resource", PropertyKind::Options)
            .default_value(json!("data"))
            .choices(vec![
                Choice::new("App", "app"),
                Choice::new("Data", "data"),
                Choice::new("Entry", "entry"),
                Choice::new("File", "file"),
                Choice::new("Workflow", "workflow"),
            ]),
        operation_selector(
            Resource::App,
            "getApps",
            vec![
                Choice::new("Get Apps", "getApps")
                    .description("Returns all app information")
                    .action("Get all app information"),
                Choice::new("Get Entries", "getEntries")
                    .description("Returns all entry information of a certain app")
                    .action("Get all entry information of a certain app"),
            ],
        ),
        operation_selector(
            Resource::Entry,
            "getFields",
            vec![Choice::new("Get Fields", "getFields")
                .description("Returns all field information of a certain entry")
                .action("Get all field information of a certain entry")],
        ),
        operation_selector(
            Resource::Data,
            "getSingleDataRecord",
            vec![
                Choice::new("Create a Data Record", "createDataRecord")
                    .action("Create a data record"),
                Choice::new("Create Many Data Records", "createManyDataRecords")
                    .action("Create many data records"),
                Choice::new("Delete a Data Record", "deleteDataRecord")
                    .description(
                        "Delete one record from the form according to the specified data ID",
                    )
                    .action("Delete a data record"),
                Choice::new("Delete Many Data Record", "deleteManyDataRecord")
                    .description(
                        "Delete multiple records from the form according to the specified data ID. A maximum of 100 records can be deleted at a time.",
                    )
                    .action("Delete many data records"),
                Choice::new("Get a Single Data Record", "getSingleDataRecord")
                    .description("Returns a single data record on a certain data ID")
                    .action("Get a single data record"),
                Choice::new("Get Many Data Records", "getManyDataRecords")
                    .description("Returns many data records sorted in ascending order of data ID")
                    .action("Get many data records"),
                Choice::new("Update a Data Record", "updateDataRecord")
                    .action("Update a data record"),
                Choice::new("Update Many Data Records", "updateManyDataRecords")
                    .description("Updates many data records. A maximum of 100 records can be updated.")
                    .action("Update many data records"),
            ],
        ),
        operation_selector(
            Resource::File,
            "getUploadToken",
            vec![
                Choice::new("Get Upload Token", "getUploadToken")
                    .description("Returns 100 upload tokens")
                    .action("Get 100 upload tokens"),
                Choice::new("Upload File", "uploadFile").action("Upload file"),
            ],
        ),
        operation_selector(
            Resource::Workflow,
            "getWorkflowInstance",
            vec![
                Choice::new("Get Workflow Instance", "getWorkflowInstance")
                    .description("Returns a workflow instance")
                    .action("Get a workflow instance"),
                Choice::new("Get Workflow Tasks", "getWorkflowTasks")
                    .description("Returns the current tasks of a user")
                    .action("Get the current tasks of a user"),
                Choice::new("Submit Workflow Task", "submitWorkflowTask")
                    .action("Submit workflow task"),
            ],
        ),
        // app and entry ids apply to almost every operation
        Property::new("App ID", "appId", PropertyKind::String)
            .default_value(json!(""))
            .required()
            .display(hide(&[
                ("resource", json!(["workflow"])),
                ("operation", json!(["getApps"])),
            ])),
        Property::new("Entry ID", "entryId", PropertyKind::String)
            .default_value(json!(""))
            .required()
            .display(hide(&[
                ("resource", json!(["workflow"])),
                ("operation", json!(["getApps", "getEntries"])),
            ])),
    ];

    properties.extend(pagination_properties(
        show(&[
            ("resource", json!(["app"])),
            ("operation", json!(["getApps", "getEntries"])),
        ]),
        true,
    ));

    properties.push(
        Property::new("Data ID", "dataId", PropertyKind::String)
            .default_value(json!(""))
            .required()
            .display(show(&[
                ("resource", json!(["data"])),
                ("operation", json!(["getSingleDataRecord"])),
            ])),
    );

    // getManyDataRecords pages with a data_id cursor instead of skip
    properties.extend(pagination_properties(
        show(&[
            ("resource", json!(["data"])),
            ("operation", json!(["getManyDataRecords"])),
        ]),
        false,
    ));
    properties.push(
        Property::new("Additional Fields", "additionalFields", PropertyKind::Collection)
            .default_value(json!({}))
            .display(show(&[
                ("resource", json!(["data"])),
                ("operation", json!(["getManyDataRecords"])),
            ]))
            .children(vec![
                Property::new("Data ID", "dataId", PropertyKind::String)
                    .default_value(json!(""))
                    .description(
                        "ID of the last record from the last query. Leave blank in case no data is returned.",
                    ),
                Property::new("Field Names or IDs", "fields", PropertyKind::MultiOptions)
                    .default_value(json!([]))
                    .description("Data fields to be queried, not required")
                    .type_options(TypeOptions {
                        load_options_method: Some("getFieldOptions".to_string()),
                        load_options_depends_on: Some(vec![
                            "appId".to_string(),
                            "entryId".to_string(),
                        ]),
                        ..TypeOptions::default()
                    }),
                Property::new("Filter (JSON)", "filter", PropertyKind::Json)
                    .default_value(json!("{\n    \"rel\": \"and\",\n    \"cond\": [\n    ]\n}"))
                    .description("Filter condition, see the data filter section of the API doc"),
            ]),
    );

    properties.push(
        Property::new("Data Record ID List (JSON)", "dataRecordIdsJson", PropertyKind::Json)
            .default_value(json!("[]"))
            .required()
            .description("Array of IDs for the data to be updated")
            .display(show(&[
                ("resource", json!(["data"])),
                ("operation", json!(["updateManyDataRecords", "deleteManyDataRecord"])),
            ])),
    );
    properties.push(
        Property::new("Data ID", "dataId", PropertyKind::String)
            .default_value(json!(""))
            .required()
            .display(show(&[
                ("resource", json!(["data"])),
                ("operation", json!(["updateDataRecord", "deleteDataRecord"])),
            ])),
    );
    properties.push(
        Property::new("Using JSON", "usingJson", PropertyKind::Boolean)
            .default_value(json!(true))
            .display(show(&[
                ("resource", json!(["data"])),
                (
                    "operation",
                    json!(["createDataRecord", "updateDataRecord", "updateManyDataRecords"]),
                ),
            ])),
    );
    properties.push(
        Property::new("Data Record (JSON)", "dataRecordJson", PropertyKind::Json)
            .default_value(json!("{\n    \"_widget_xxxx\": {\n        \"value\": 42\n    }\n}"))
            .description("Data record in JSON format, keyed by widget name")
            .display(
                show(&[
                    ("resource", json!(["data"])),
                    (
                        "operation",
                        json!(["createDataRecord", "updateDataRecord", "updateManyDataRecords"]),
                    ),
                ])
                .show_when("usingJson", json!([true])),
            ),
    );
    properties.push(
        Property::new("Additional Fields", "additionalFields", PropertyKind::Collection)
            .default_value(json!({}))
            .display(show(&[
                ("resource", json!(["data"])),
                ("operation", json!(["createDataRecord"])),
            ]))
            .children(vec![
                data_creator_field(),
                is_start_workflow_field(),
                is_start_trigger_field(),
                transaction_id_field(),
            ]),
    );
    properties.push(
        Property::new("Additional Fields", "additionalFields", PropertyKind::Collection)
            .default_value(json!({}))
            .display(show(&[
                ("resource", json!(["data"])),
                ("operation", json!(["updateDataRecord"])),
            ]))
            .children(vec![is_start_trigger_field(), transaction_id_field()]),
    );
    properties.push(
        Property::new("Additional Fields", "additionalFields", PropertyKind::Collection)
            .default_value(json!({}))
            .display(show(&[
                ("resource", json!(["data"])),
                ("operation", json!(["updateManyDataRecords"])),
            ]))
            .children(vec![transaction_id_field()]),
    );
    properties.push(
        Property::new("Additional Fields", "additionalFields", PropertyKind::Collection)
            .default_value(json!({}))
            .display(show(&[
                ("resource", json!(["data"])),
                ("operation", json!(["deleteDataRecord"])),
            ]))
            .children(vec![is_start_trigger_field()]),
    );
    properties.push(
        Property::new("Data Record List (JSON)", "dataRecordJson", PropertyKind::Json)
            .default_value(json!(
                "[\n    {\n        \"_widget_xxxx\": {\n            \"value\": 42\n        }\n    }\n]"
            ))
            .description("Data records in JSON format")
            .display(show(&[
                ("resource", json!(["data"])),
                ("operation", json!(["createManyDataRecords"])),
            ])),
    );
    properties.push(
        Property::new("Additional Fields", "additionalFields", PropertyKind::Collection)
            .default_value(json!({}))
            .display(show(&[
                ("resource", json!(["data"])),
                ("operation", json!(["createManyDataRecords"])),
            ]))
            .children(vec![
                data_creator_field(),
                is_start_workflow_field(),
                transaction_id_field(),
            ]),
    );

    properties.push(
        Property::new("Transaction ID", "transactionId", PropertyKind::String)
            .default_value(json!(""))
            .required()
            .description(
                "Generated by the caller; UUID format is recommended. Binds a batch of uploaded files.",
            )
            .display(show(&[
                ("resource", json!(["file"])),
                ("operation", json!(["getUploadToken"])),
            ])),
    );
    properties.push(
        Property::new("URL", "url", PropertyKind::String)
            .default_value(json!(""))
            .required()
            .description("File upload URL")
            .display(show(&[
                ("resource", json!(["file"])),
                ("operation", json!(["uploadFile"])),
            ])),
    );
    properties.push(
        Property::new("Token", "token", PropertyKind::String)
            .default_value(json!(""))
            .required()
            .description("File upload credentials")
            .display(show(&[
                ("resource", json!(["file"])),
                ("operation", json!(["uploadFile"])),
            ])),
    );
    properties.push(
        Property::new("Input Binary Field", "binaryPropertyName", PropertyKind::String)
            .default_value(json!("data"))
            .required()
            .description("The name of the input binary field containing the file to be uploaded")
            .display(show(&[
                ("resource", json!(["file"])),
                ("operation", json!(["uploadFile"])),
            ])),
    );

    properties.push(
        Property::new("User Name", "username", PropertyKind::String)
            .default_value(json!(""))
            .required()
            .description("It refers to the User No. in Contacts")
            .display(show(&[
                ("resource", json!(["workflow"])),
                ("operation", json!(["getWorkflowTasks", "submitWorkflowTask"])),
            ])),
    );
    properties.push(
        Property::new("Instance ID", "instanceId", PropertyKind::String)
            .default_value(json!(""))
            .required()
            .description("Instance ID is the same as data_id")
            .display(show(&[
                ("resource", json!(["workflow"])),
                ("operation", json!(["getWorkflowInstance", "submitWorkflowTask"])),
            ])),
    );
    properties.push(
        Property::new("Return Tasks", "returnTasks", PropertyKind::Boolean)
            .default_value(json!(false))
            .display(show(&[
                ("resource", json!(["workflow"])),
                ("operation", json!(["getWorkflowInstance"])),
            ])),
    );
    properties.extend(pagination_properties(
        show(&[
            ("resource", json!(["workflow"])),
            ("operation", json!(["getWorkflowTasks"])),
        ]),
        true,
    ));
    properties.push(
        Property::new("Task ID", "taskId", PropertyKind::String)
            .default_value(json!(""))
            .required()
            .description("Task ID (should correspond with the user name)")
            .display(show(&[
                ("resource", json!(["workflow"])),
                ("operation", json!(["submitWorkflowTask"])),
            ])),
    );
    properties.push(
        Property::new("Comment", "comment", PropertyKind::String)
            .default_value(json!(""))
            .description("Approval comment")
            .display(show(&[
                ("resource", json!(["workflow"])),
                ("operation", json!(["submitWorkflowTask"])),
            ])),
    );

    NodeDescriptor {
        display_name: "Jiandaoyun".to_string(),
        name: "jiandaoyun".to_string(),
        group: vec!["input".to_string()],
        version: 1,
        description: "Consume Jiandaoyun API".to_string(),
        inputs: vec!["main".to_string()],
        outputs: vec!["main".to_string()],
        credentials: vec![CredentialRef {
            name: CREDENTIAL_NAME.to_string(),
            required: true,
        }],
        properties,
    }
}

fn data_creator_field() -> Property {
    Property::new("Data Creator", "dataCreator", PropertyKind::String)
        .default_value(json!(""))
        .description(
            "The member who submits data, identified by the member's No. from the contact APIs",
        )
}

fn is_start_workflow_field() -> Property {
    Property::new("Is Start Workflow", "isStartWorkflow", PropertyKind::Boolean)
        .default_value(json!(false))
        .description("Whether to initiate workflows (only works in workflow forms)")
}

fn is_start_trigger_field() -> Property {
    Property::new("Is Start Trigger", "isStartTrigger", PropertyKind::Boolean)
        .default_value(json!(false))
        .description("Whether to trigger automations")
}

fn transaction_id_field() -> Property {
    Property::new("Transaction ID", "transactionId", PropertyKind::String)
        .default_value(json!(""))
        .description(
            "Binds a batch of uploaded files; must match the transaction_id used to fetch upload credentials when the data includes attachments or images",
        )
}

pub fn credential_descriptor() -> CredentialDescriptor {
    CredentialDescriptor {
        name: CREDENTIAL_NAME.to_string(),
        display_name: "Jiandaoyun API".to_string(),
        documentation_url: "https://hc.jiandaoyun.com/open/10992".to_string(),
        properties: vec![
            Property::new("OpenAPI Server", "server", PropertyKind::String)
                .default_value(json!(crate::domain::model::DEFAULT_SERVER))
                .description(
                    "Switch to https://dev.jiandaoyun.com/ only for development purposes",
                ),
            Property::new("API Key", "apiKey", PropertyKind::String)
                .default_value(json!(""))
                .type_options(TypeOptions {
                    password: Some(true),
                    ..TypeOptions::default()
                }),
        ],
    }
}

/// The request a host issues to verify the credential.
pub fn credential_test_request() -> ApiRequest {
    ApiRequest::post("/api/v5/app/list", json!({ "limit": 1 }))
}

/// Resolves which declared properties are visible for the given selection.
/// `extra` carries non-selector parameters that gate visibility, e.g.
/// `usingJson`.
pub fn visible_properties<'a>(
    descriptor: &'a NodeDescriptor,
    resource: Resource,
    operation: Operation,
    extra: &Map<String, Value>,
) -> Vec<&'a Property> {
    let mut current = Map::new();
    current.insert("resource".to_string(), json!(resource.as_str()));
    current.insert("operation".to_string(), json!(operation.as_str()));
    for (key, value) in extra {
        current.insert(key.clone(), value.clone());
    }

    descriptor
        .properties
        .iter()
        .filter(|property| {
            property
                .display_options
                .as_ref()
                .map_or(true, |display| display.is_visible(&current))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible_names(resource: Resource, operation: Operation, extra: Value) -> Vec<String> {
        let descriptor = node_descriptor();
        let extra = match extra {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        visible_properties(&descriptor, resource, operation, &extra)
            .into_iter()
            .map(|p| p.name.clone())
            .collect()
    }

    #[test]
    fn test_resource_selector_default() {
        let descriptor = node_descriptor();
        let resource = &descriptor.properties[0];
        assert_eq!(resource.name, "resource");
        assert_eq!(resource.default, json!("data"));
        assert_eq!(resource.options.len(), 5);
    }

    #[test]
    fn test_every_operation_appears_in_a_selector() {
        let descriptor = node_descriptor();
        let declared: Vec<String> = descriptor
            .properties
            .iter()
            .filter(|p| p.name == "operation")
            .flat_map(|p| &p.options)
            .filter_map(|option| match option {
                PropertyOption::Choice(choice) => choice.value.as_str().map(str::to_string),
                PropertyOption::Nested(_) => None,
            })
            .collect();

        for operation in [
            "getApps",
            "getEntries",
            "getFields",
            "getSingleDataRecord",
            "getManyDataRecords",
            "createDataRecord",
            "createManyDataRecords",
            "updateDataRecord",
            "updateManyDataRecords",
            "deleteDataRecord",
            "deleteManyDataRecord",
            "getUploadToken",
            "uploadFile",
            "getWorkflowInstance",
            "getWorkflowTasks",
            "submitWorkflowTask",
        ] {
            assert!(declared.contains(&operation.to_string()), "{} missing", operation);
        }
    }

    #[test]
    fn test_app_id_hidden_for_workflow_and_get_apps() {
        let names = visible_names(Resource::Workflow, Operation::GetWorkflowTasks, json!({}));
        assert!(!names.contains(&"appId".to_string()));

        let names = visible_names(Resource::App, Operation::GetApps, json!({}));
        assert!(!names.contains(&"appId".to_string()));
        assert!(!names.contains(&"entryId".to_string()));

        let names = visible_names(Resource::App, Operation::GetEntries, json!({}));
        assert!(names.contains(&"appId".to_string()));
        assert!(!names.contains(&"entryId".to_string()));

        let names = visible_names(Resource::Data, Operation::GetSingleDataRecord, json!({}));
        assert!(names.contains(&"appId".to_string()));
        assert!(names.contains(&"entryId".to_string()));
        assert!(names.contains(&"dataId".to_string()));
    }

    #[test]
    fn test_data_record_json_gated_on_using_json() {
        let names = visible_names(
            Resource::Data,
            Operation::CreateDataRecord,
            json!({ "usingJson": true }),
        );
        assert!(names.contains(&"dataRecordJson".to_string()));

        let names = visible_names(
            Resource::Data,
            Operation::CreateDataRecord,
            json!({ "usingJson": false }),
        );
        assert!(!names.contains(&"dataRecordJson".to_string()));
    }

    #[test]
    fn test_get_many_uses_cursor_pagination() {
        let names = visible_names(Resource::Data, Operation::GetManyDataRecords, json!({}));
        assert!(names.contains(&"returnCount".to_string()));
        assert!(!names.contains(&"skipCount".to_string()));

        let names = visible_names(Resource::App, Operation::GetApps, json!({}));
        assert!(names.contains(&"returnCount".to_string()));
        assert!(names.contains(&"skipCount".to_string()));
    }

    #[test]
    fn test_return_count_bounds() {
        let descriptor = node_descriptor();
        let return_count = descriptor
            .properties
            .iter()
            .find(|p| p.name == "returnCount")
            .unwrap();
        let type_options = return_count.type_options.as_ref().unwrap();
        assert_eq!(type_options.min_value, Some(1));
        assert_eq!(type_options.max_value, Some(100));
        assert_eq!(return_count.default, json!(100));
    }

    #[test]
    fn test_fields_option_loading_declaration() {
        let descriptor = node_descriptor();
        let fields = descriptor
            .properties
            .iter()
            .filter(|p| p.name == "additionalFields")
            .flat_map(|p| &p.options)
            .find_map(|option| match option {
                PropertyOption::Nested(nested) if nested.name == "fields" => Some(nested),
                _ => None,
            })
            .unwrap();
        let type_options = fields.type_options.as_ref().unwrap();
        assert_eq!(type_options.load_options_method.as_deref(), Some("getFieldOptions"));
        assert_eq!(
            type_options.load_options_depends_on,
            Some(vec!["appId".to_string(), "entryId".to_string()])
        );
    }

    #[test]
    fn test_credential_descriptor_and_test_request() {
        let credential = credential_descriptor();
        assert_eq!(credential.name, CREDENTIAL_NAME);
        let api_key = credential.properties.iter().find(|p| p.name == "apiKey").unwrap();
        assert_eq!(
            api_key.type_options.as_ref().unwrap().password,
            Some(true)
        );

        let request = credential_test_request();
        assert_eq!(request.endpoint, "/api/v5/app/list");
        assert_eq!(request.body, json!({ "limit": 1 }));
    }

    #[test]
    fn test_property_wire_shape() {
        let property = Property::new("App ID", "appId", PropertyKind::String)
            .default_value(json!(""))
            .required()
            .display(hide(&[("resource", json!(["workflow"]))]));
        let value = serde_json::to_value(&property).unwrap();
        assert_eq!(
            value,
            json!({
                "displayName": "App ID",
                "name": "appId",
                "type": "string",
                "default": "",
                "required": true,
                "displayOptions": { "hide": { "resource": ["workflow"] } },
            })
        );
    }
}

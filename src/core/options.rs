use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::Transport;
use crate::utils::error::Result;

/// One selectable field for the `fields` multi-select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub name: String,
    pub value: String,
}

/// Loads the widgets of an entry for the field multi-select, user-defined
/// widgets first, then the system ones. The label becomes
/// `"{label} ({name})"` when a label exists.
pub async fn list_field_options(
    transport: &dyn Transport,
    app_id: &str,
    entry_id: &str,
) -> Result<Vec<FieldOption>> {
    let response = transport
        .post_json(
            "/api/v5/app/entry/widget/list",
            &json!({ "app_id": app_id, "entry_id": entry_id }),
        )
        .await?;

    let mut options = Vec::new();
    for group in ["widgets", "sysWidgets"] {
        let widgets = match response.get(group).and_then(|v| v.as_array()) {
            Some(widgets) => widgets,
            None => continue,
        };
        for widget in widgets {
            let widget_name = widget.get("name").and_then(|v| v.as_str()).unwrap_or("");
            let label = widget.get("label").and_then(|v| v.as_str()).unwrap_or("");
            let name = if label.is_empty() {
                widget_name.to_string()
            } else {
                format!("{} ({})", label, widget_name)
            };
            options.push(FieldOption {
                name,
                value: widget_name.to_string(),
            });
        }
    }

    Ok(options)
}

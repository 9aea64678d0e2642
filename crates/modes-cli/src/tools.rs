//! The five mode operations as MCP tools

use modes_core::catalog::UNKNOWN_TOKEN_COST;
use modes_core::ModeSwitcher;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::protocol::{McpTool, ToolAnnotations, ToolsCallResponse, ToolsListResponse};

#[derive(Debug)]
pub enum ToolCallError {
    UnknownTool(String),
    InvalidArguments(String),
}

#[derive(Debug, Deserialize)]
struct SwitchArgs {
    mode: String,
    #[serde(default)]
    confirm: bool,
}

#[derive(Debug, Deserialize)]
struct SaveArgs {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_token_cost")]
    token_cost: String,
}

fn default_token_cost() -> String {
    UNKNOWN_TOKEN_COST.to_string()
}

/// Tool definitions advertised by `tools/list`
pub fn definitions() -> Vec<McpTool> {
    let read_only = Some(ToolAnnotations {
        read_only_hint: Some(true),
        destructive_hint: Some(false),
        idempotent_hint: Some(true),
    });

    vec![
        McpTool {
            name: "list_modes".to_string(),
            description: "List all mode profiles with descriptions, estimated token costs and connectors.".to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
            annotations: read_only.clone(),
        },
        McpTool {
            name: "current_mode".to_string(),
            description: "Identify which mode profile the current configuration matches, or 'custom' if none.".to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
            annotations: read_only.clone(),
        },
        McpTool {
            name: "switch_mode".to_string(),
            description: "Switch to a different mode profile. WARNING: with confirm=true the application restarts and the current conversation is lost. Without confirm only a preview is returned.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "mode": {"type": "string", "description": "Name of the mode to switch to"},
                    "confirm": {"type": "boolean", "default": false, "description": "Must be true to actually switch"}
                },
                "required": ["mode"]
            }),
            annotations: Some(ToolAnnotations {
                read_only_hint: Some(false),
                destructive_hint: Some(true),
                idempotent_hint: Some(false),
            }),
        },
        McpTool {
            name: "save_current_as_mode".to_string(),
            description: "Save the current configuration as a new mode profile. Names are lowercased and hyphenated; existing modes are never overwritten.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "Name for the new mode, e.g. \"writing\""},
                    "description": {"type": "string", "default": "", "description": "What the mode is for"},
                    "token_cost": {"type": "string", "default": UNKNOWN_TOKEN_COST, "description": "Estimated token cost, e.g. \"~20k tokens\""}
                },
                "required": ["name"]
            }),
            annotations: Some(ToolAnnotations {
                read_only_hint: Some(false),
                destructive_hint: Some(false),
                idempotent_hint: Some(false),
            }),
        },
        McpTool {
            name: "list_backups".to_string(),
            description: "List the most recent configuration backups taken before mode switches.".to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
            annotations: read_only,
        },
    ]
}

pub fn list_response() -> ToolsListResponse {
    ToolsListResponse {
        tools: definitions(),
        next_cursor: None,
    }
}

/// Run a tool and wrap its text result
pub fn call_tool(
    switcher: &ModeSwitcher,
    name: &str,
    arguments: Value,
) -> Result<ToolsCallResponse, ToolCallError> {
    let text = match name {
        "list_modes" => switcher.list_modes(),
        "current_mode" => switcher.current_mode(),
        "list_backups" => switcher.list_backups(),
        "switch_mode" => {
            let args: SwitchArgs = parse_args(arguments)?;
            switcher.switch_mode(&args.mode, args.confirm)
        }
        "save_current_as_mode" => {
            let args: SaveArgs = parse_args(arguments)?;
            switcher.save_current_as_mode(&args.name, &args.description, &args.token_cost)
        }
        other => return Err(ToolCallError::UnknownTool(other.to_string())),
    };

    tracing::debug!(tool = name, "tool call finished");
    Ok(ToolsCallResponse::text(text))
}

fn parse_args<T: serde::de::DeserializeOwned>(arguments: Value) -> Result<T, ToolCallError> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| ToolCallError::InvalidArguments(e.to_string()))
}

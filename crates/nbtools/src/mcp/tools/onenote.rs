//! OneNote tools exposed over MCP

use crate::prelude::eprintln;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{CallToolResult, Content, JsonRpcError, Tool};
use crate::onenote::transport::Transport;
use crate::onenote::Organizer;

const CONTAINER_ID_HELP: &str = "Notebook or section group ID. Prefix with 'notebook:' or 'sectionGroup:' to skip the type lookup.";

#[derive(Deserialize)]
struct NameArgs {
    name: String,
}

#[derive(Deserialize)]
struct ContainerArgs {
    container_id: String,
}

#[derive(Deserialize)]
struct OptionalContainerArgs {
    container_id: Option<String>,
}

#[derive(Deserialize)]
struct CreateChildArgs {
    container_id: String,
    name: String,
}

fn tool(name: &str, description: &str, input_schema: serde_json::Value) -> Tool {
    Tool {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

fn container_schema(required: bool) -> serde_json::Value {
    let required = if required {
        json!(["container_id"])
    } else {
        json!([])
    };

    json!({
        "type": "object",
        "properties": {
            "container_id": {"type": "string", "description": CONTAINER_ID_HELP}
        },
        "required": required
    })
}

fn create_child_schema(what: &str) -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "container_id": {"type": "string", "description": CONTAINER_ID_HELP},
            "name": {
                "type": "string",
                "description": format!("Display name of the new {what}. Must not contain ? * \\ / : < > | & # ' % ~")
            }
        },
        "required": ["container_id", "name"]
    })
}

pub fn tools() -> Vec<Tool> {
    vec![
        tool(
            "onenote_list_notebooks",
            "List every OneNote notebook of the signed-in user. Requires the NBTOOLS_GRAPH_TOKEN environment variable.",
            json!({"type": "object", "properties": {}, "required": []}),
        ),
        tool(
            "onenote_create_notebook",
            "Create a new OneNote notebook and return its normalized record.",
            json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "Display name of the new notebook"}
                },
                "required": ["name"]
            }),
        ),
        tool(
            "onenote_list_sections",
            "List sections. With container_id, only the sections directly inside that notebook or section group; otherwise every section.",
            container_schema(false),
        ),
        tool(
            "onenote_create_section",
            "Create a section inside a notebook or section group. Sections cannot contain other sections.",
            create_child_schema("section"),
        ),
        tool(
            "onenote_list_section_groups",
            "List section groups. With container_id, only the section groups directly inside that notebook or section group; otherwise every section group.",
            container_schema(false),
        ),
        tool(
            "onenote_create_section_group",
            "Create a section group inside a notebook or section group. Fails with permission_denied when the container is a section.",
            create_child_schema("section group"),
        ),
        tool(
            "onenote_list_children",
            "List the sections and section groups directly inside a notebook or section group. If section groups cannot be listed, sections are still returned with a warning.",
            container_schema(true),
        ),
        tool(
            "onenote_section_group_tree",
            "Return the nested section group tree below a notebook or section group, including each group's sections.",
            container_schema(true),
        ),
        tool(
            "onenote_resolve_container",
            "Determine whether an ID denotes a notebook, section group or section.",
            json!({
                "type": "object",
                "properties": {
                    "container_id": {"type": "string", "description": "Any OneNote container ID, optionally prefixed with 'notebook:', 'sectionGroup:' or 'section:'"}
                },
                "required": ["container_id"]
            }),
        ),
    ]
}

fn parse_args<A: DeserializeOwned>(arguments: Option<serde_json::Value>) -> Result<A, JsonRpcError> {
    serde_json::from_value(arguments.unwrap_or_else(|| json!({}))).map_err(|e| JsonRpcError {
        code: -32602,
        message: format!("Invalid arguments: {e}"),
        data: None,
    })
}

fn tool_error(e: nbtools_core::Error) -> JsonRpcError {
    let code = match e {
        nbtools_core::Error::InvalidArgument(_) => -32602,
        _ => -32603,
    };

    JsonRpcError {
        code,
        message: format!("Tool execution error: {e}"),
        data: Some(json!({"code": e.code()})),
    }
}

fn wrap_result<S: Serialize>(data: &S) -> Result<serde_json::Value, JsonRpcError> {
    let json_string = serde_json::to_string_pretty(data).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Serialization error: {e}"),
        data: None,
    })?;

    let result = CallToolResult {
        content: vec![Content::Text { text: json_string }],
        is_error: None,
    };

    serde_json::to_value(result).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Serialization error: {e}"),
        data: None,
    })
}

/// Handle any `onenote_*` tool call via MCP
pub async fn handle_onenote_tool(
    name: &str,
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    if global.verbose {
        eprintln!("Calling {name}: arguments={arguments:?}");
    }

    let organizer = Organizer::from_global(global).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Configuration error: {e}"),
        data: None,
    })?;

    dispatch(&organizer, name, arguments).await
}

async fn dispatch<T: Transport>(
    organizer: &Organizer<T>,
    name: &str,
    arguments: Option<serde_json::Value>,
) -> Result<serde_json::Value, JsonRpcError> {
    match name {
        "onenote_list_notebooks" => {
            let notebooks = organizer.list_notebooks().await.map_err(tool_error)?;
            wrap_result(&notebooks)
        }
        "onenote_create_notebook" => {
            let args: NameArgs = parse_args(arguments)?;
            let notebook = organizer
                .create_notebook(&args.name)
                .await
                .map_err(tool_error)?;
            wrap_result(&notebook)
        }
        "onenote_list_sections" => {
            let args: OptionalContainerArgs = parse_args(arguments)?;
            let sections = organizer
                .list_sections(args.container_id.as_deref())
                .await
                .map_err(tool_error)?;
            wrap_result(&sections)
        }
        "onenote_create_section" => {
            let args: CreateChildArgs = parse_args(arguments)?;
            let section = organizer
                .create_section(&args.container_id, &args.name)
                .await
                .map_err(tool_error)?;
            wrap_result(&section)
        }
        "onenote_list_section_groups" => {
            let args: OptionalContainerArgs = parse_args(arguments)?;
            let groups = organizer
                .list_section_groups(args.container_id.as_deref())
                .await
                .map_err(tool_error)?;
            wrap_result(&groups)
        }
        "onenote_create_section_group" => {
            let args: CreateChildArgs = parse_args(arguments)?;
            let group = organizer
                .create_section_group(&args.container_id, &args.name)
                .await
                .map_err(tool_error)?;
            wrap_result(&group)
        }
        "onenote_list_children" => {
            let args: ContainerArgs = parse_args(arguments)?;
            let listing = organizer
                .list_immediate_children(&args.container_id)
                .await
                .map_err(tool_error)?;
            wrap_result(&listing)
        }
        "onenote_section_group_tree" => {
            let args: ContainerArgs = parse_args(arguments)?;
            let tree = organizer
                .list_section_group_tree(&args.container_id)
                .await
                .map_err(tool_error)?;
            wrap_result(&tree)
        }
        "onenote_resolve_container" => {
            let args: ContainerArgs = parse_args(arguments)?;
            let resolution = organizer
                .resolve_container(&args.container_id)
                .await
                .map_err(tool_error)?;
            wrap_result(&resolution)
        }
        _ => Err(JsonRpcError {
            code: -32602,
            message: format!("Unknown tool: {name}"),
            data: None,
        }),
    }
}

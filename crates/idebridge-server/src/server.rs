//! MCP server handler backed by a [`Bridge`]

use std::sync::Arc;

use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, ListToolsResult, PaginatedRequestParams,
    ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::ErrorData as McpError;
use serde_json::Value;

use idebridge_core::{Bridge, InvocationResult, ToolDescriptor};

const INSTRUCTIONS: &str = "Tools of the locally running JetBrains IDE. \
The list follows the IDE: it changes when the IDE restarts or enables other tools.";

#[derive(Clone)]
pub struct BridgeServer {
    bridge: Arc<Bridge>,
}

impl BridgeServer {
    pub fn new(bridge: Arc<Bridge>) -> Self {
        Self { bridge }
    }
}

pub fn to_mcp_tool(descriptor: &ToolDescriptor) -> Tool {
    Tool::new(
        descriptor.name.clone(),
        descriptor.description.clone(),
        Arc::new(descriptor.schema_object()),
    )
}

pub fn to_call_result(result: InvocationResult) -> CallToolResult {
    let content = vec![Content::text(result.text)];
    if result.is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

impl ServerHandler for BridgeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_tool_list_changed()
                .build(),
            instructions: Some(INSTRUCTIONS.to_string()),
            ..ServerInfo::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = self.bridge.list_tools().await;
        Ok(ListToolsResult::with_all_items(tools.iter().map(to_mcp_tool).collect()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let arguments = request
            .arguments
            .map(Value::Object)
            .unwrap_or_else(|| Value::Object(Default::default()));
        let result = self.bridge.call_tool(&request.name, arguments).await;
        Ok(to_call_result(result))
    }
}

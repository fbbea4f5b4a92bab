use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    AnnotateAble, CallToolResult, Content, Implementation, ListResourcesResult,
    PaginatedRequestParam, ProtocolVersion, RawResource, ReadResourceRequestParam,
    ReadResourceResult, ResourceContents, ServerCapabilities, ServerInfo,
};
use rmcp::schemars::{self, JsonSchema};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;

use crate::control::{ControlError, Controller};
use crate::keymap;
use crate::vnc::MouseButton;

pub const KEYMAP_URI: &str = "resource://keymap";

const INSTRUCTIONS: &str = "This MCP server connects to a VNC server and drives it remotely. \
It provides tools for taking screenshots, clicking and dragging the mouse, typing text, \
pressing keyboard shortcuts, and waiting for a period of time. \
Coordinates are addressed in a fixed 1024x768 logical space regardless of the remote \
resolution. Make sure the VNC_HOST and VNC_PASS environment variables are set to the \
correct values before starting the server.";

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ClickParams {
    /// X coordinate in the 1024x768 logical display space
    pub x: u16,
    /// Y coordinate in the 1024x768 logical display space
    pub y: u16,
    /// Number of clicks, e.g. 2 for a double click
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

fn default_repeat() -> u32 {
    1
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TypeTextParams {
    /// Text to enter on the keyboard; printable ASCII only
    pub text: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct KeyboardShortcutParams {
    /// Keys to press simultaneously, e.g. ["shift", "e"] or ["enter"].
    /// Use the keymap resource to see the valid key names.
    pub keys: Vec<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SleepParams {
    /// Number of seconds to wait
    pub seconds: f64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DragParams {
    /// Start X coordinate in the logical display space
    pub x_start: u16,
    /// Start Y coordinate in the logical display space
    pub y_start: u16,
    /// End X coordinate in the logical display space
    pub x_end: u16,
    /// End Y coordinate in the logical display space
    pub y_end: u16,
}

#[derive(Clone)]
pub struct VncControlServer {
    controller: Arc<Controller>,
    tool_router: ToolRouter<Self>,
}

impl VncControlServer {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller: Arc::new(controller),
            tool_router: Self::tool_router(),
        }
    }

    /// The VNC session layer blocks on the TCP stream, so facade operations
    /// run off the async executor.
    async fn run_blocking<T, F>(&self, op: F) -> Result<T, McpError>
    where
        T: Send + 'static,
        F: FnOnce(&Controller) -> Result<T, ControlError> + Send + 'static,
    {
        let controller = self.controller.clone();
        tokio::task::spawn_blocking(move || op(&controller))
            .await
            .map_err(|e| McpError::internal_error(format!("worker task failed: {e}"), None))?
            .map_err(tool_error)
    }
}

fn tool_error(err: ControlError) -> McpError {
    match err {
        ControlError::Key(_) | ControlError::UnsupportedCharacter(_) => {
            McpError::invalid_params(err.to_string(), None)
        }
        _ => McpError::internal_error(err.to_string(), None),
    }
}

fn done() -> CallToolResult {
    CallToolResult::success(vec![Content::text("ok")])
}

#[tool_router]
impl VncControlServer {
    #[tool(
        description = "Take a screenshot of the current remote screen and return it as a JPEG image"
    )]
    async fn screenshot(&self) -> Result<CallToolResult, McpError> {
        let bytes = self.run_blocking(|c| c.screenshot()).await?;
        Ok(CallToolResult::success(vec![Content::image(
            BASE64.encode(bytes),
            "image/jpeg",
        )]))
    }

    #[tool(
        description = "Left mouse click at the given [x],[y] coordinates (for [repeat] times, e.g. 2 for double click)"
    )]
    async fn left_mouse_click(
        &self,
        Parameters(ClickParams { x, y, repeat }): Parameters<ClickParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run_blocking(move |c| c.click(x, y, MouseButton::Left, repeat))
            .await?;
        Ok(done())
    }

    #[tool(
        description = "Right mouse click at the given [x],[y] coordinates (for [repeat] times, e.g. 2 for double click)"
    )]
    async fn right_mouse_click(
        &self,
        Parameters(ClickParams { x, y, repeat }): Parameters<ClickParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run_blocking(move |c| c.click(x, y, MouseButton::Right, repeat))
            .await?;
        Ok(done())
    }

    #[tool(
        description = "Enter the given text on the keyboard. Printable ASCII only; \
uppercase letters are sent as shifted key presses."
    )]
    async fn type_text(
        &self,
        Parameters(TypeTextParams { text }): Parameters<TypeTextParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run_blocking(move |c| c.type_text(&text)).await?;
        Ok(done())
    }

    #[tool(
        description = "Press the given keys simultaneously; e.g. [\"shift\", \"e\"] or [\"enter\"]. \
Use the keymap resource to see the valid key names."
    )]
    async fn keyboard_shortcut(
        &self,
        Parameters(KeyboardShortcutParams { keys }): Parameters<KeyboardShortcutParams>,
    ) -> Result<CallToolResult, McpError> {
        if keys.is_empty() {
            return Err(McpError::invalid_params("keys must not be empty", None));
        }
        self.run_blocking(move |c| c.keyboard_shortcut(&keys))
            .await?;
        Ok(done())
    }

    #[tool(
        description = "Sleep for the given number of seconds. Use this when you need to wait \
to be able to continue a task."
    )]
    async fn sleep(
        &self,
        Parameters(SleepParams { seconds }): Parameters<SleepParams>,
    ) -> Result<CallToolResult, McpError> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(McpError::invalid_params(
                "seconds must be a non-negative number",
                None,
            ));
        }
        tokio::time::sleep(Duration::from_secs_f64(seconds)).await;
        Ok(done())
    }

    #[tool(
        description = "Drag the mouse from the given [x_start],[y_start] coordinates to the given \
[x_end],[y_end] coordinates. Does NOT work like a touchscreen drag."
    )]
    async fn mouse_drag(
        &self,
        Parameters(DragParams {
            x_start,
            y_start,
            x_end,
            y_end,
        }): Parameters<DragParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run_blocking(move |c| c.drag(x_start, y_start, x_end, y_end))
            .await?;
        Ok(done())
    }
}

#[tool_handler]
impl ServerHandler for VncControlServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(INSTRUCTIONS.into()),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let mut resource = RawResource::new(KEYMAP_URI, "keymap");
        resource.description = Some("Valid key names for e.g. keyboard shortcuts".into());
        resource.mime_type = Some("application/json".into());
        Ok(ListResourcesResult {
            resources: vec![resource.no_annotation()],
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri }: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        if uri != KEYMAP_URI {
            return Err(McpError::resource_not_found(
                format!("unknown resource: {uri}"),
                None,
            ));
        }
        let body = serde_json::to_string(&keymap::key_names())
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(body, uri)],
        })
    }
}

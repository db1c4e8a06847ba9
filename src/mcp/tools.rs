/// MCP Tool handlers for docqa.
///
/// 1. ask       – ranked passages for a question
/// 2. ping      – readiness and corpus size
/// 3. get_chunk – one chunk with its locator metadata
use crate::mcp::server::McpContext;
use crate::qa::QaError;
use rmcp::handler::server::ServerHandler;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{ErrorData as McpError, handler::server::tool::ToolRouter, model::*, tool, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;

// ── Parameter structs ────────────────────────────────────────────────

#[derive(Deserialize, JsonSchema)]
struct AskParams {
    /// Question in natural language (at least 2 characters)
    question: String,
    /// Max passages (default: 3, max: 10)
    top_k: Option<usize>,
}

#[derive(Deserialize, JsonSchema)]
struct ChunkIdParam {
    /// Chunk id, e.g. 'notes.txt#c0' or 'report.pdf#p2c1'
    id: String,
}

// ── Response helpers ─────────────────────────────────────────────────

fn json_result(value: serde_json::Value) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&value).unwrap_or_default(),
    )]))
}

fn error_result(msg: &str) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(msg.to_string())]))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, McpError> {
    serde_json::to_value(value)
        .map_err(|e| McpError::internal_error(format!("serialization failed: {e}"), None))
}

// ── Tool implementations ─────────────────────────────────────────────

#[derive(Clone)]
pub struct AppTools {
    pub ctx: McpContext,
    pub tool_router: ToolRouter<Self>,
}

impl ServerHandler for AppTools {}

#[tool_router]
impl AppTools {
    pub fn new(ctx: McpContext) -> Self {
        Self {
            ctx,
            tool_router: Self::tool_router(),
        }
    }

    // ── Tool 1: ask ─────────────────────────────────────────────────

    #[tool(
        description = "Answer a question with the most relevant passages from the local text, PDF and CSV corpus, ranked by TF-IDF cosine similarity."
    )]
    async fn ask(&self, params: Parameters<AskParams>) -> Result<CallToolResult, McpError> {
        let p = params.0;
        match self.ctx.service.ask(&p.question, p.top_k) {
            Ok(resp) => json_result(to_json(&resp)?),
            Err(e @ QaError::InvalidQuery(_)) => error_result(&e.to_string()),
            Err(e @ QaError::EmptyCorpus { .. }) => error_result(&format!("unavailable: {e}")),
        }
    }

    // ── Tool 2: ping ────────────────────────────────────────────────

    #[tool(description = "Report readiness and the number of indexed chunks")]
    async fn ping(&self) -> Result<CallToolResult, McpError> {
        json_result(to_json(&self.ctx.service.ping())?)
    }

    // ── Tool 3: get_chunk ───────────────────────────────────────────

    #[tool(description = "Fetch one indexed chunk by id, including its source locator")]
    async fn get_chunk(
        &self,
        params: Parameters<ChunkIdParam>,
    ) -> Result<CallToolResult, McpError> {
        let id = &params.0.id;
        if id.is_empty() {
            return error_result("id is required");
        }

        match self.ctx.service.retriever().chunk(id) {
            Some(chunk) => {
                let mut obj = to_json(chunk)?;
                obj["kind"] = to_json(&chunk.kind())?;
                json_result(obj)
            }
            None => error_result(&format!("chunk not found: {id}")),
        }
    }
}

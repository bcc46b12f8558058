//! Journal MCP Server implementation

use std::sync::Arc;

use anyhow::Result;
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use kairo_recall::{Candidate, RetrievalEngine};

/// Parameters for journal_ask tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AskParams {
    /// Natural language question (e.g., "When did I last feel proud of my work?")
    #[schemars(description = "Natural language question about the journal")]
    pub question: String,
    /// Journal owner asking the question; only their entries are returned
    #[schemars(description = "Owner (user) id of the requester")]
    pub owner_id: i64,
}

/// Answer for JSON output
#[derive(Debug, Serialize)]
struct AnswerJson {
    answer: String,
    headline_sentiment: String,
    generation: u64,
    entries: Vec<Candidate>,
}

/// Journal MCP Service
#[derive(Clone)]
pub struct JournalService {
    engine: Arc<RetrievalEngine>,
    tool_router: ToolRouter<Self>,
}

impl JournalService {
    pub fn new(engine: Arc<RetrievalEngine>) -> Self {
        Self {
            engine,
            tool_router: Self::tool_router(),
        }
    }

    /// Run engine work off the async executor; model calls block
    async fn blocking<T, F>(&self, work: F) -> Result<T, McpError>
    where
        T: Send + 'static,
        F: FnOnce(&RetrievalEngine) -> T + Send + 'static,
    {
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || work(engine.as_ref()))
            .await
            .map_err(|e| McpError::internal_error(format!("Engine task failed: {}", e), None))
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let output = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(format!("JSON serialization failed: {}", e), None)
    })?;
    Ok(CallToolResult::success(vec![Content::text(output)]))
}

#[tool_router]
impl JournalService {
    /// Answer a question from the requester's journal entries
    #[tool(description = "Ask a question about a user's journal. Returns up to 3 of their entries closest in meaning to the question, preferring entries written in the same mood, plus the detected mood of the question.")]
    async fn journal_ask(
        &self,
        params: Parameters<AskParams>,
    ) -> Result<CallToolResult, McpError> {
        let AskParams { question, owner_id } = params.0;

        let result = self
            .blocking(move |engine| engine.answer_question(&question, owner_id))
            .await?
            .map_err(|e| McpError::internal_error(format!("Question failed: {}", e), None))?;

        to_json(&AnswerJson {
            answer: result.summary(),
            headline_sentiment: result.headline_sentiment,
            generation: result.generation,
            entries: result.candidates,
        })
    }

    /// Rebuild the retrieval index from the journal
    #[tool(description = "Rebuild the journal retrieval index so recently written or deleted entries are reflected. Concurrent requests collapse into the rebuild already running.")]
    async fn journal_reindex(&self) -> Result<CallToolResult, McpError> {
        let outcome = self
            .blocking(|engine| engine.rebuild_index())
            .await?
            .map_err(|e| McpError::internal_error(format!("Rebuild failed: {}", e), None))?;

        to_json(&outcome)
    }

    /// Report index health
    #[tool(description = "Get journal retrieval index status: generation, vector count, staleness, and last rebuild error.")]
    async fn journal_status(&self) -> Result<CallToolResult, McpError> {
        to_json(&self.engine.status())
    }
}

#[tool_handler]
impl ServerHandler for JournalService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Kairo journal MCP Server. Answers questions from a user's journal entries using semantic search with mood-aware ranking.".to_string()
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Run the MCP server over stdio
pub async fn run_mcp_server(engine: Arc<RetrievalEngine>) -> Result<()> {
    use tokio::io::{stdin, stdout};

    let service = JournalService::new(engine);
    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    tracing::info!("journal MCP server ready");
    server.waiting().await?;

    Ok(())
}

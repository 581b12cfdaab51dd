//! 网页搜索工具（Exa）

use rig::tool::Tool;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::llm::tools::ToolError;

const SNIPPET_CHARS: usize = 500;
const MAX_RESULTS: u32 = 10;

/// 网页搜索工具
#[derive(Debug, Clone)]
pub struct AgentToolWebSearch {
    config: SearchConfig,
    http: reqwest::Client,
}

/// 搜索参数
#[derive(Debug, Deserialize)]
pub struct WebSearchArgs {
    pub query: String,
    pub num_results: Option<u32>,
}

/// 单条搜索结果
#[derive(Debug, Serialize, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// 搜索结果
#[derive(Debug, Serialize, Default)]
pub struct WebSearchResult {
    pub results: Vec<SearchHit>,
    pub note: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaSearchRequest<'a> {
    query: &'a str,
    num_results: u32,
    #[serde(rename = "type")]
    search_type: &'static str,
    contents: ExaContents,
}

#[derive(Serialize)]
struct ExaContents {
    text: bool,
}

#[derive(Deserialize)]
struct ExaSearchResponse {
    results: Vec<ExaResult>,
}

#[derive(Deserialize)]
struct ExaResult {
    title: Option<String>,
    url: String,
    text: Option<String>,
}

impl From<ExaResult> for SearchHit {
    fn from(result: ExaResult) -> Self {
        Self {
            title: result.title.unwrap_or_default(),
            url: result.url,
            snippet: result
                .text
                .unwrap_or_default()
                .chars()
                .take(SNIPPET_CHARS)
                .collect(),
        }
    }
}

impl AgentToolWebSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.config.api_key.trim().is_empty()
    }

    fn result_count(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.config.num_results)
            .clamp(1, MAX_RESULTS)
    }

    async fn search(&self, args: &WebSearchArgs) -> Result<WebSearchResult, ToolError> {
        let request = ExaSearchRequest {
            query: &args.query,
            num_results: self.result_count(args.num_results),
            search_type: "auto",
            contents: ExaContents { text: true },
        };

        let url = format!("{}/search", self.config.api_base_url.trim_end_matches('/'));
        let response: ExaSearchResponse = self
            .http
            .post(url)
            .header("x-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(WebSearchResult {
            results: response.results.into_iter().map(SearchHit::from).collect(),
            note: None,
        })
    }
}

impl Tool for AgentToolWebSearch {
    const NAME: &'static str = "web_search";

    type Error = ToolError;
    type Args = WebSearchArgs;
    type Output = WebSearchResult;

    async fn definition(&self, _prompt: String) -> rig::completion::ToolDefinition {
        rig::completion::ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Search the web and return titles, URLs and text snippets of the best matching pages.".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query."
                    },
                    "num_results": {
                        "type": "integer",
                        "description": "Number of results to return (1-10)."
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        debug!(query = %args.query, "tool called: web_search");

        if !self.is_configured() {
            warn!("web_search called but no search API key is configured");
            return Ok(WebSearchResult {
                results: vec![],
                note: Some(
                    "Web search is not configured. Rely on your own knowledge and say so in the sources."
                        .to_string(),
                ),
            });
        }

        self.search(&args).await
    }
}

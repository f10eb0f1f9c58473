use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use serde_json;
use serde_derive::Serialize;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use url::Url;

use crate::errors::AskError;
use crate::helpers;

pub const MODEL_NAME: &str = "text-davinci-003";
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GenerationParams {
	pub model: String,
	pub temperature: f64,
	pub max_tokens: u32,
	pub top_p: f64,
	pub frequency_penalty: f64,
	pub presence_penalty: f64,
}

impl Default for GenerationParams {
	fn default() -> Self {
		GenerationParams {
			model: MODEL_NAME.to_string(),
			temperature: 0.75,
			max_tokens: 650,
			top_p: 1.0,
			frequency_penalty: 0.0,
			presence_penalty: 0.0,
		}
	}
}

#[derive(Serialize, Debug)]
pub struct CompletionRequest {
	#[serde(flatten)]
	pub params: GenerationParams,
	pub prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApiAuth {
	/// `Authorization: Bearer <key>`
	Bearer,
	/// Azure style `api-key: <key>`
	ApiKeyHeader,
}

#[derive(Clone)]
pub struct ApiEndpoint {
	pub post_url: Url,
	pub api_key: String,
	pub auth: ApiAuth,
}

impl fmt::Debug for ApiEndpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ApiEndpoint")
			.field("post_url", &self.post_url.as_str())
			.field("api_key", &"[REDACTED]")
			.field("auth", &self.auth)
			.finish()
	}
}

impl ApiEndpoint {
	pub fn new(post_url: &str, api_key: String, auth: ApiAuth) -> Result<Self, AskError> {
		let post_url = Url::parse(post_url).map_err(|e| AskError::Config(format!("invalid API url {}: {}", post_url, e)))?;
		Ok(ApiEndpoint { post_url, api_key, auth })
	}

	/// Azure variables win, then `OPENAI_API_KEY`, then the key file.
	pub fn resolve<F>(lookup: F, api_key_file: &Path) -> Result<Self, AskError>
	where
		F: Fn(&str) -> Option<String>,
	{
		if let (Some(key), Some(base), Some(ver)) = (lookup("AZURE_API_KEY").filter(|k| !k.is_empty()), lookup("AZURE_API_BASE"), lookup("AZURE_API_VERSION")) {
			let url = format!("{}completions?api-version={}", base, ver);
			return Self::new(&url, key, ApiAuth::ApiKeyHeader);
		}

		let base = lookup("OPENAI_API_BASE").unwrap_or_else(|| OPENAI_API_BASE.to_string());
		let url = format!("{}/completions", base.trim_end_matches('/'));
		if let Some(key) = lookup("OPENAI_API_KEY").filter(|k| !k.is_empty()) {
			return Self::new(&url, key, ApiAuth::Bearer);
		}

		if api_key_file.exists() {
			let key = helpers::read_api_key_file(api_key_file)?;
			return Self::new(&url, key, ApiAuth::Bearer);
		}

		Err(AskError::Config(format!(
			"no API key: set OPENAI_API_KEY (or AZURE_API_KEY, AZURE_API_BASE and AZURE_API_VERSION) or create {}",
			api_key_file.display()
		)))
	}
}

#[derive(Debug)]
pub struct CompletionClient {
	endpoint: ApiEndpoint,
	params: GenerationParams,
	client: reqwest::Client,
	/// Where `last_request.json` and `last_response.json` go, if anywhere.
	pub dump_dir: Option<PathBuf>,
}

impl CompletionClient {
	pub fn new(endpoint: ApiEndpoint, timeout: Duration) -> Result<Self, AskError> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| AskError::Config(format!("failed to create HTTP client: {}", e)))?;
		Ok(CompletionClient {
			endpoint,
			params: GenerationParams::default(),
			client,
			dump_dir: None,
		})
	}

	pub async fn complete(&self, prompt: &str) -> Result<String, AskError> {
		let request = CompletionRequest {
			params: self.params.clone(),
			prompt: prompt.to_string(),
		};
		if let Some(dir) = &self.dump_dir {
			helpers::save_to_json(dir.join("last_request.json"), &request)?;
		}
		let serialised = serde_json::to_string(&request).map_err(helpers::HelperError::from)?;

		log::debug!("POST {}", self.endpoint.post_url);
		let mut req = self.client
			.post(self.endpoint.post_url.clone())
			.header(CONTENT_TYPE, "application/json");
		req = match self.endpoint.auth {
			ApiAuth::Bearer => req.header(AUTHORIZATION, format!("Bearer {}", self.endpoint.api_key)),
			ApiAuth::ApiKeyHeader => req.header("api-key", &self.endpoint.api_key),
		};
		let resp = req.body(serialised).send().await?;
		let status = resp.status();
		let body = resp.text().await?;
		log::debug!("response status {} ({} bytes)", status, body.len());
		if let Some(dir) = &self.dump_dir {
			fs::write(dir.join("last_response.json"), &body).map_err(helpers::HelperError::from)?;
		}

		if !status.is_success() {
			return Err(AskError::service(format!("HTTP {}: {}", status, Self::error_message(&body))));
		}
		Self::parse_response(&body)
	}

	/// Text of the first choice in a completions response.
	pub fn parse_response(response: &str) -> Result<String, AskError> {
		let json: serde_json::Value = serde_json::from_str(response)
			.map_err(|e| AskError::service(format!("response is not JSON: {}", e)))?;
		let text = json
			.get("choices").ok_or_else(|| AskError::service("no choices in the response"))?
			.get(0).ok_or_else(|| AskError::service("the response has no choices"))?
			.get("text").and_then(|t| t.as_str())
			.ok_or_else(|| AskError::service("no text in the first choice"))?;
		Ok(text.to_string())
	}

	fn error_message(body: &str) -> String {
		serde_json::from_str::<serde_json::Value>(body)
			.ok()
			.and_then(|json| json.pointer("/error/message").and_then(|m| m.as_str()).map(str::to_string))
			.unwrap_or_else(|| body.trim().to_string())
	}
}

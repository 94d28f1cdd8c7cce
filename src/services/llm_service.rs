//! LLM 服务 - 业务能力层
//!
//! 只负责"把 prompt 交给模型、拿回原始输出"，不关心流程
//!
//! ## 技术栈
//! - Ollama `/api/generate`：使用 `reqwest` 直接调用
//! - 兼容 OpenAI API 的服务：使用 `async-openai` crate
//!
//! 一次阻塞调用，不流式、不重试、不设超时

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::config::{Config, LlmBackend};
use crate::error::AppError;

/// 模型的原始输出
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelResponse {
    /// 单个文本字段
    Text(String),
    /// 分块输出，每块一个文本字段
    Chunks(Vec<String>),
    /// 没有可用文本
    Unusable,
}

impl ModelResponse {
    /// 解码 Ollama 返回的 JSON：`{response}` 或 `[{response}, …]`
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Array(chunks) => ModelResponse::Chunks(
                chunks
                    .iter()
                    .map(|chunk| {
                        chunk
                            .get("response")
                            .and_then(JsonValue::as_str)
                            .unwrap_or_default()
                            .to_string()
                    })
                    .collect(),
            ),
            _ => match value.get("response").and_then(JsonValue::as_str) {
                Some(text) => ModelResponse::Text(text.to_string()),
                None => ModelResponse::Unusable,
            },
        }
    }

    /// 合并后的全文；空文本视为不可用
    pub fn full_text(&self) -> Option<String> {
        let text = match self {
            ModelResponse::Text(text) => text.clone(),
            ModelResponse::Chunks(chunks) => chunks.join("\n"),
            ModelResponse::Unusable => return None,
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// 答案生成能力
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    fn model_name(&self) -> &str;

    /// 发送 prompt，返回模型原始输出
    async fn generate(&self, prompt: &str) -> Result<ModelResponse>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Ollama 生成接口客户端
pub struct OllamaGenerator {
    client: reqwest::Client,
    endpoint: String,
    model_name: String,
}

impl OllamaGenerator {
    pub fn new(api_base_url: &str, model_name: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/api/generate", api_base_url.trim_end_matches('/')),
            model_name: model_name.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnswerGenerator for OllamaGenerator {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn generate(&self, prompt: &str) -> Result<ModelResponse> {
        debug!(
            "调用 Ollama，模型: {}，prompt 长度: {} 字符",
            self.model_name,
            prompt.len()
        );

        let request = GenerateRequest {
            model: &self.model_name,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Ollama 调用失败: {}", e);
                AppError::llm_request_failed(&self.model_name, e)
            })?;

        // 非 2xx 的 JSON 响应照常解码，没有 response 文本即视为不可用
        let status = response.status();
        if !status.is_success() {
            warn!("Ollama 返回状态 {}", status);
        }

        let body: JsonValue = response
            .json()
            .await
            .map_err(|e| AppError::llm_bad_response(&self.model_name, e))?;

        debug!("Ollama 调用成功");
        Ok(ModelResponse::from_json(&body))
    }
}

/// 兼容 OpenAI 的 chat completion 客户端
pub struct ChatCompletionGenerator {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl ChatCompletionGenerator {
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        }
    }
}

#[async_trait]
impl AnswerGenerator for ChatCompletionGenerator {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn generate(&self, prompt: &str) -> Result<ModelResponse> {
        debug!("调用 chat completion，模型: {}", self.model_name);

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .temperature(0.3)
            .max_tokens(1024u32)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_request_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone());

        Ok(match content {
            Some(text) => ModelResponse::Text(text.trim().to_string()),
            None => ModelResponse::Unusable,
        })
    }
}

/// 按配置选择后端
pub fn build_generator(config: &Config) -> Box<dyn AnswerGenerator> {
    match config.llm_backend {
        LlmBackend::Ollama => Box::new(OllamaGenerator::new(
            &config.llm_api_base_url,
            &config.llm_model_name,
        )),
        LlmBackend::OpenAi => Box::new(ChatCompletionGenerator::new(config)),
    }
}

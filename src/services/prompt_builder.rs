//! 答案请求构建 - 业务能力层
//!
//! 把提取出的题目整理成一次性发送给模型的 prompt

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::QuestionSet;

static LETTERED_OPTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-E]\.").expect("valid regex"));

/// 固定的指令头
pub const PROMPT_HEADER: &str = r#"You're an AI assistant helping fill a multiple-choice form. For each question below, return only the correct option letter (A–E).

Respond in this exact format:
A

Example:
B

Rules:
- Do not explain.
- Do not include the answer text.
- Do not include question numbers.
- Do not include punctuation or extra text.
- Only return the correct option letter (A–E).
- Do not invent questions.
- Do not skip any answers.
- Do not prefix answers with 'Q:' or 'A:' — just return the option letter only.
- Do not return values like "320" or "East" — only the letter of the correct option."#;

/// 选项重新编号：已带 "A." 前缀的保持原样
pub fn label_options(options: &[String]) -> Vec<String> {
    options
        .iter()
        .enumerate()
        .map(|(j, option)| {
            let option = option.trim();
            if LETTERED_OPTION.is_match(option) {
                option.to_string()
            } else {
                let letter = char::from_u32('A' as u32 + j as u32).unwrap_or('?');
                format!("{}. {}", letter, option)
            }
        })
        .collect()
}

/// prompt 构建器
pub struct PromptBuilder {
    header: String,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            header: PROMPT_HEADER.to_string(),
        }
    }

    /// 使用自定义指令头
    pub fn with_header(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }

    /// 构建完整 prompt：指令头 + 按提取顺序排列的题目块（空行分隔）
    pub fn build(&self, questions: &QuestionSet) -> String {
        let blocks: Vec<String> = questions
            .iter()
            .map(|q| {
                format!(
                    "{}\nOptions:\n{}",
                    q.normalized_text,
                    label_options(&q.options).join("\n")
                )
            })
            .collect();

        let prompt = format!("{}\n\n{}", self.header, blocks.join("\n\n"));
        debug!("📤 最终 prompt:\n{}", prompt);
        prompt
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

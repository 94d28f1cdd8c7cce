//! 题目提取服务 - 业务能力层
//!
//! 只负责"从文档中读出题目和选项"，不关心流程

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::infrastructure::{text_lines, ControlRole, FormDocument, FormElement};
use crate::models::{QuestionItem, QuestionSet};
use crate::text::{is_personal, normalize};
use crate::utils::truncate_text;

static NUMBERED_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+\.").expect("valid regex"));
static QUESTION_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\?|what|angle|clock|time|direction)").expect("valid regex")
});
static OPTION_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Ea-e]\.").expect("valid regex"));
static NUMBER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.\s*").expect("valid regex"));

/// 去掉行首的 "1." / "10." 题号
pub fn strip_number_prefix(line: &str) -> &str {
    match NUMBER_PREFIX.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// 是否以 "1." 形式的题号开头
pub fn is_numbered_line(line: &str) -> bool {
    NUMBERED_LINE.is_match(line)
}

/// 从列表项文本中挑出题干行
///
/// 优先带题号或疑问线索的行，其次第一条非选项行，最后第一行
pub fn pick_question_line(item_text: &str) -> String {
    let lines = text_lines(item_text);
    let line = lines
        .iter()
        .find(|line| is_numbered_line(line) || QUESTION_CUE.is_match(line))
        .or_else(|| lines.iter().find(|line| !OPTION_LINE.is_match(line)))
        .or_else(|| lines.first())
        .copied()
        .unwrap_or("");
    strip_number_prefix(line).trim().to_string()
}

/// 题目提取服务
///
/// 职责：
/// - 遍历列表项，构建有序的 题干 → 选项 结构
/// - 跳过个人信息问题和没有选项的列表项
pub struct QuestionExtractor;

impl QuestionExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 按文档顺序提取所有选择题
    pub async fn extract<D: FormDocument>(&self, document: &D) -> Result<QuestionSet> {
        let items = document.query_all(ControlRole::ListItem).await?;
        debug!("找到 {} 个列表项", items.len());

        let mut questions = QuestionSet::new();
        for (index, item) in items.iter().enumerate() {
            match self.extract_item(item).await {
                Ok(Some(question)) => {
                    let key = question.normalized_text.clone();
                    if questions.insert(question) {
                        warn!("⚠️ 题干重复，后者覆盖前者: {}", key);
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("⚠️ 读取第 {} 个列表项失败: {}", index + 1, e),
            }
        }

        info!("🧠 共提取 {} 道选择题", questions.len());
        for (label, key) in questions.diagnostic_index() {
            info!("🔍 {}: {}", label, key);
        }

        Ok(questions)
    }

    async fn extract_item<E: FormElement>(&self, item: &E) -> Result<Option<QuestionItem>> {
        let text = item.visible_text().await?;
        let raw_text = pick_question_line(&text);
        let normalized_text = normalize(&raw_text);
        debug!(
            "🧠 列表项首行: {} → {}",
            truncate_text(text_lines(&text).first().copied().unwrap_or(""), 60),
            normalized_text
        );

        if normalized_text.is_empty() || is_personal(&normalized_text) {
            debug!("⚠️ 跳过个人信息或无效题目: {}", normalized_text);
            return Ok(None);
        }

        let mut options = Vec::new();
        for control in item.query_all(ControlRole::Choice).await? {
            let label = control.label_or_text().await?;
            if !label.trim().is_empty() {
                options.push(label);
            }
        }

        if options.is_empty() {
            warn!("⚠️ 没有找到选项: {}", raw_text);
            return Ok(None);
        }

        Ok(Some(QuestionItem::new(raw_text, normalized_text, options)))
    }
}

impl Default for QuestionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

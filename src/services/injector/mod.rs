//! 字段注入服务 - 业务能力层
//!
//! 按控件族把答案写回文档。每个控件族是一种填写策略，
//! 固定顺序依次执行，每一轮都重新查询文档（前一轮的点击可能改变页面）。
//! 所有策略都是尽力而为：单个控件失败只记录日志，不中断。

mod checkbox;
mod dropdown;
mod free_text;
mod radio;

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::Pacing;
use crate::infrastructure::{text_lines, FormDocument};
use crate::models::{AnswerMap, FilledSet};
use crate::services::question_extractor::is_numbered_line;
use crate::text::TextRelation;

pub use checkbox::CheckboxFill;
pub use dropdown::DropdownFill;
pub use free_text::FreeTextFill;
pub use radio::RadioFill;

/// 控件族
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFamily {
    FreeText,
    Radio,
    Checkbox,
    Dropdown,
}

impl fmt::Display for ControlFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControlFamily::FreeText => "文本框",
            ControlFamily::Radio => "单选",
            ControlFamily::Checkbox => "复选",
            ControlFamily::Dropdown => "下拉框",
        };
        f.write_str(name)
    }
}

/// 单个控件族的填写策略
#[async_trait]
pub trait FillStrategy<D: FormDocument>: Send + Sync {
    fn family(&self) -> ControlFamily;

    /// 遍历文档中该族的控件并写入答案；只有整体查询失败才返回错误
    async fn fill(&self, document: &D, answers: &AnswerMap, filled: &mut FilledSet) -> Result<()>;
}

/// 字段注入器
pub struct FieldInjector<D: FormDocument> {
    strategies: Vec<Box<dyn FillStrategy<D>>>,
}

impl<D: FormDocument> FieldInjector<D> {
    /// 标准顺序：文本框 → 单选 → 复选 → 下拉框
    pub fn new(pacing: &Pacing) -> Self {
        Self {
            strategies: vec![
                Box::new(FreeTextFill::new()),
                Box::new(RadioFill::new(pacing.post_click_settle)),
                Box::new(CheckboxFill::new()),
                Box::new(DropdownFill::new(pacing.dropdown_open_settle)),
            ],
        }
    }

    pub fn families(&self) -> Vec<ControlFamily> {
        self.strategies.iter().map(|s| s.family()).collect()
    }

    /// 依次执行所有策略，返回成功写入的题目集合
    pub async fn inject(&self, document: &D, answers: &AnswerMap) -> FilledSet {
        let mut filled = FilledSet::new();

        for strategy in &self.strategies {
            let family = strategy.family();
            info!("✍️ 开始填写{}...", family);
            if let Err(e) = strategy.fill(document, answers, &mut filled).await {
                warn!("⚠️ {}填写中断: {}", family, e);
            }
        }

        for question in answers.keys() {
            if !filled.contains(question) {
                warn!("⚠️ 未填写的题目: {}", question);
            }
        }

        filled
    }
}

/// 在答案表中找到与 key 有模糊关系的第一条答案
pub(crate) fn resolve_answer<'a>(
    key: &str,
    answers: &'a AnswerMap,
) -> Option<(&'a str, &'a str, TextRelation)> {
    answers.iter().find_map(|(question, answer)| {
        TextRelation::between(key, question).map(|relation| (question, answer, relation))
    })
}

/// 列表项的题干行：带题号的行，否则第一行
pub(crate) fn numbered_or_first_line(item_text: &str) -> String {
    let lines = text_lines(item_text);
    lines
        .iter()
        .find(|line| is_numbered_line(line))
        .or_else(|| lines.first())
        .map(|line| line.to_string())
        .unwrap_or_default()
}

/// 列表项的第一行
pub(crate) fn first_line(item_text: &str) -> String {
    text_lines(item_text)
        .first()
        .map(|line| line.to_string())
        .unwrap_or_default()
}

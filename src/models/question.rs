//! 题目数据结构

use serde::Serialize;

/// 从表单中提取的一道选择题
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionItem {
    /// 原始题干（已去掉题号前缀）
    pub raw_text: String,
    /// 规范化题干，作为题目的唯一标识
    pub normalized_text: String,
    /// 选项文本，按文档顺序，顺序即字母 A、B、C……
    pub options: Vec<String>,
}

impl QuestionItem {
    pub fn new(raw_text: impl Into<String>, normalized_text: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            normalized_text: normalized_text.into(),
            options,
        }
    }
}

/// 按提取顺序排列的题目集合
///
/// 规范化题干相同的题目后者覆盖前者，但保留前者的位置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuestionSet {
    items: Vec<QuestionItem>,
}

impl QuestionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入题目，返回是否覆盖了已有题目
    pub fn insert(&mut self, item: QuestionItem) -> bool {
        match self
            .items
            .iter_mut()
            .find(|existing| existing.normalized_text == item.normalized_text)
        {
            Some(existing) => {
                *existing = item;
                true
            }
            None => {
                self.items.push(item);
                false
            }
        }
    }

    pub fn get(&self, normalized_text: &str) -> Option<&QuestionItem> {
        self.items
            .iter()
            .find(|item| item.normalized_text == normalized_text)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuestionItem> {
        self.items.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.normalized_text.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 诊断用的 "Q1, Q2, …" 编号
    pub fn diagnostic_index(&self) -> Vec<(String, &str)> {
        self.keys()
            .enumerate()
            .map(|(i, key)| (format!("Q{}", i + 1), key))
            .collect()
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a QuestionItem;
    type IntoIter = std::slice::Iter<'a, QuestionItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

//! 答案数据结构

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// 模型返回的答案字母，只接受 A–D
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnswerLetter(char);

impl AnswerLetter {
    /// 解析恰好一个字母的 token（大小写不敏感）
    pub fn parse(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        let c = chars.next()?.to_ascii_uppercase();
        if chars.next().is_some() || !('A'..='D').contains(&c) {
            return None;
        }
        Some(Self(c))
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for AnswerLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 规范化题干 → 选中选项原文
///
/// 保持插入顺序；注入阶段只读
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnswerMap {
    entries: Vec<(String, String)>,
}

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        let question = question.into();
        let answer = answer.into();
        match self.entries.iter_mut().find(|(q, _)| *q == question) {
            Some(entry) => entry.1 = answer,
            None => self.entries.push((question, answer)),
        }
    }

    pub fn get(&self, question: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(q, _)| q == question)
            .map(|(_, a)| a.as_str())
    }

    pub fn contains_key(&self, question: &str) -> bool {
        self.get(question).is_some()
    }

    /// 只保留满足条件的条目
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        self.entries.retain(|(q, a)| keep(q, a));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(q, a)| (q.as_str(), a.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(q, _)| q.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 已成功写入的规范化题干，仅用于诊断
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilledSet(BTreeSet<String>);

impl FilledSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, question: impl Into<String>) {
        self.0.insert(question.into());
    }

    pub fn contains(&self, question: &str) -> bool {
        self.0.contains(question)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

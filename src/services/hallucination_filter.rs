//! 幻觉过滤 - 业务能力层
//!
//! 注入前删除无法追溯到已提取题目的答案，防止按位置对应时发生错位

use tracing::{info, warn};

use crate::models::{AnswerMap, QuestionSet};
use crate::text::mutual_substring;

/// 只保留与某道已提取题目互为子串的答案，返回删除数量
pub fn filter_hallucinations(answers: &mut AnswerMap, questions: &QuestionSet) -> usize {
    let before = answers.len();
    answers.retain(|key, _| {
        let traceable = questions.keys().any(|q| mutual_substring(q, key));
        if !traceable {
            warn!("🚫 删除无法追溯的答案: {}", key);
        }
        traceable
    });

    let removed = before - answers.len();
    if removed > 0 {
        info!("🧹 幻觉过滤删除 {} 条答案，保留 {} 条", removed, answers.len());
    }
    removed
}

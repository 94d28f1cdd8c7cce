//! 答案解析服务 - 业务能力层
//!
//! 把模型输出解码为字母，再按位置对应到题目和选项原文

use tracing::{debug, info, warn};

use crate::models::{AnswerLetter, AnswerMap, QuestionSet};
use crate::services::llm_service::ModelResponse;

/// 从模型文本中提取答案字母
///
/// 截掉第一个 "Note:" 之后的内容，按换行/逗号切分，
/// 只保留恰好一个 A–D 字母的 token，最多取 `question_count` 个
pub fn extract_letters(text: &str, question_count: usize) -> Vec<AnswerLetter> {
    let cleaned = text.split("Note:").next().unwrap_or_default().trim();

    cleaned
        .split(['\n', ','])
        .map(str::trim)
        .filter_map(AnswerLetter::parse)
        .take(question_count)
        .collect()
}

/// 找到以 "{字母}." / "{字母})" / "{字母} " 开头的第一个选项（大小写不敏感）
pub fn match_option(options: &[String], letter: AnswerLetter) -> Option<&str> {
    let prefixes = [
        format!("{}.", letter),
        format!("{})", letter),
        format!("{} ", letter),
    ];
    options
        .iter()
        .find(|option| {
            let upper = option.trim().to_uppercase();
            prefixes.iter().any(|p| upper.starts_with(p.as_str()))
        })
        .map(String::as_str)
}

/// 按位置把字母对应到题目：第 i 个字母回答第 i 道题
pub fn build_answer_map(questions: &QuestionSet, letters: &[AnswerLetter]) -> AnswerMap {
    if letters.len() != questions.len() {
        warn!(
            "⚠️ 模型返回 {} 个答案，但有 {} 道题",
            letters.len(),
            questions.len()
        );
    }

    let mut answers = AnswerMap::new();
    for (i, question) in questions.iter().enumerate() {
        let Some(&letter) = letters.get(i) else {
            debug!("🚫 Q{} 缺少答案", i + 1);
            continue;
        };

        match match_option(&question.options, letter) {
            Some(option) => {
                info!("✅ Q{}: {} → {}", i + 1, question.normalized_text, option);
                answers.insert(question.normalized_text.clone(), option);
            }
            None => warn!("🚫 Q{} 没有以 {} 开头的选项", i + 1, letter),
        }
    }

    let unanswered: Vec<&str> = questions
        .keys()
        .filter(|key| !answers.contains_key(key))
        .collect();
    if !unanswered.is_empty() {
        warn!("⚠️ 未作答题目 {} 道:", unanswered.len());
        for (i, key) in unanswered.iter().enumerate() {
            warn!("  {}. {}", i + 1, key);
        }
    }

    answers
}

/// 解析模型输出；没有可用文本时返回空答案表
pub fn parse_response(response: &ModelResponse, questions: &QuestionSet) -> AnswerMap {
    let Some(text) = response.full_text() else {
        warn!("❌ 模型没有返回可用内容");
        return AnswerMap::new();
    };
    debug!("🧾 模型原始输出:\n{}", text);

    let letters = extract_letters(&text, questions.len());
    info!(
        "📥 答案字母: {:?}",
        letters.iter().map(|l| l.as_char()).collect::<String>()
    );

    build_answer_map(questions, &letters)
}

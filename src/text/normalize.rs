use std::sync::LazyLock;

use regex::Regex;

/// 保留：单词字符、货币符号、百分号、连字符、&、斜杠、空白
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\p{Sc}%\-&/\s]").expect("valid regex"));
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static CLOCK_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2}):(\d{2})").expect("valid regex"));

/// 把采集到的文本规范化为比较用的 key
///
/// 纯函数，不会失败，且幂等：`normalize(normalize(x)) == normalize(x)`
pub fn normalize(text: &str) -> String {
    let text = text.replace('\u{00A0}', " ");
    let text = DISALLOWED.replace_all(&text, "");
    let text = WHITESPACE_RUN.replace_all(&text, " ");
    // 10:20 → 1020
    let text = CLOCK_TIME.replace_all(&text, "$1$2");
    text.to_lowercase().trim().to_string()
}

/// 涉及个人身份信息的关键词
const PERSONAL_KEYWORDS: [&str; 6] = ["name", "whatsapp", "department", "year", "email", "phone"];

/// 判断问题是否在询问个人信息
///
/// 这类问题不交给模型回答，也不会被注入的答案覆盖
pub fn is_personal(text: &str) -> bool {
    let lower = text.to_lowercase();
    PERSONAL_KEYWORDS.iter().any(|k| lower.contains(k))
}

use std::fmt;

/// 两个规范化字符串之间的模糊关系
///
/// 按 `ORDER` 的顺序判断，第一个成立的关系胜出。
/// 任一方为空时不存在任何关系。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRelation {
    /// 完全相同
    Exact,
    /// subject 包含 target
    Contains,
    /// subject 被 target 包含
    ContainedBy,
    /// subject 是 target 的前缀
    PrefixOf,
    /// target 是 subject 的前缀
    PrefixedBy,
}

impl TextRelation {
    pub const ORDER: [TextRelation; 5] = [
        TextRelation::Exact,
        TextRelation::Contains,
        TextRelation::ContainedBy,
        TextRelation::PrefixOf,
        TextRelation::PrefixedBy,
    ];

    /// 单个关系是否成立
    pub fn holds(self, subject: &str, target: &str) -> bool {
        if subject.is_empty() || target.is_empty() {
            return false;
        }
        match self {
            TextRelation::Exact => subject == target,
            TextRelation::Contains => subject.contains(target),
            TextRelation::ContainedBy => target.contains(subject),
            TextRelation::PrefixOf => target.starts_with(subject),
            TextRelation::PrefixedBy => subject.starts_with(target),
        }
    }

    /// 返回第一个成立的关系
    pub fn between(subject: &str, target: &str) -> Option<TextRelation> {
        Self::ORDER.into_iter().find(|r| r.holds(subject, target))
    }
}

impl fmt::Display for TextRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextRelation::Exact => "exact",
            TextRelation::Contains => "contains",
            TextRelation::ContainedBy => "contained-by",
            TextRelation::PrefixOf => "prefix-of",
            TextRelation::PrefixedBy => "prefixed-by",
        };
        f.write_str(name)
    }
}

/// 互为子串：任一方包含另一方
pub fn mutual_substring(a: &str, b: &str) -> bool {
    TextRelation::Contains.holds(a, b) || TextRelation::ContainedBy.holds(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_relation() {
        assert_eq!(TextRelation::between("abc", "abc"), Some(TextRelation::Exact));
        assert_eq!(
            TextRelation::between("what is the angle now", "the angle"),
            Some(TextRelation::Contains)
        );
        assert_eq!(
            TextRelation::between("angle", "what is the angle"),
            Some(TextRelation::ContainedBy)
        );
        assert_eq!(TextRelation::between("abc", "xyz"), None);
    }

    #[test]
    fn test_prefix_relations_hold_individually() {
        assert!(TextRelation::PrefixOf.holds("what is", "what is the angle"));
        assert!(!TextRelation::PrefixOf.holds("the angle", "what is the angle"));
        assert!(TextRelation::PrefixedBy.holds("what is the angle", "what is"));
        // 前缀关系也是包含关系，按顺序会先命中 ContainedBy
        assert_eq!(
            TextRelation::between("what is", "what is the angle"),
            Some(TextRelation::ContainedBy)
        );
    }

    #[test]
    fn test_empty_strings_never_relate() {
        assert_eq!(TextRelation::between("", "abc"), None);
        assert_eq!(TextRelation::between("abc", ""), None);
        assert_eq!(TextRelation::between("", ""), None);
        assert!(!mutual_substring("", "abc"));
    }

    #[test]
    fn test_mutual_substring() {
        assert!(mutual_substring("what is the angle", "angle"));
        assert!(mutual_substring("angle", "what is the angle"));
        assert!(mutual_substring("same", "same"));
        assert!(!mutual_substring("left", "right"));
    }
}

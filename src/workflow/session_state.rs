//! 会话状态机的状态

use std::fmt;

/// 一次填写会话经历的阶段，按顺序推进
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionState {
    Launch,
    Navigate,
    DetectRestriction,
    Extract,
    BuildPrompt,
    RequestAnswers,
    ParseAnswers,
    FilterHallucinations,
    InjectAnswers,
    Capture,
    Submit,
    Close,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Launch => "启动浏览器",
            SessionState::Navigate => "打开表单",
            SessionState::DetectRestriction => "检测登录限制",
            SessionState::Extract => "提取题目",
            SessionState::BuildPrompt => "构建 prompt",
            SessionState::RequestAnswers => "请求模型作答",
            SessionState::ParseAnswers => "解析答案",
            SessionState::FilterHallucinations => "过滤幻觉答案",
            SessionState::InjectAnswers => "填写答案",
            SessionState::Capture => "截图",
            SessionState::Submit => "提交",
            SessionState::Close => "关闭会话",
        };
        f.write_str(name)
    }
}

//! 文档能力接口 - 基础设施层
//!
//! 核心流程只依赖这里定义的能力，不直接接触浏览器驱动

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

/// 结构化角色 / 标签谓词
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRole {
    /// 一道题所在的列表项
    ListItem,
    /// 可选中的选项（单选、复选、下拉选项）
    Choice,
    Radio,
    Checkbox,
    /// 下拉框
    Listbox,
    /// 下拉框中的选项
    ListboxOption,
    /// 可自由输入文本的控件
    TextEntry,
    /// 邮箱输入框（受限表单标志）
    EmailInput,
    Button,
}

impl ControlRole {
    /// 对应的 CSS 选择器
    pub fn selector(self) -> &'static str {
        match self {
            ControlRole::ListItem => r#"div[role="listitem"]"#,
            ControlRole::Choice => {
                r#"div[role="radio"], div[role="option"], div[role="checkbox"]"#
            }
            ControlRole::Radio => r#"div[role="radio"]"#,
            ControlRole::Checkbox => r#"div[role="checkbox"]"#,
            ControlRole::Listbox => r#"div[role="listbox"]"#,
            ControlRole::ListboxOption => r#"div[role="option"]"#,
            ControlRole::TextEntry => {
                r#"input:not([type="hidden"]):not([type="radio"]):not([type="checkbox"]):not([type="submit"]):not([type="button"]), textarea"#
            }
            ControlRole::EmailInput => r#"input[type="email"]"#,
            ControlRole::Button => r#"div[role="button"]"#,
        }
    }
}

/// 文档中的单个元素
///
/// 每次调用都是一次对浏览器的等待点
#[async_trait]
pub trait FormElement: Send + Sync + Sized {
    /// 无障碍标签（aria-label），空白视为不存在
    async fn accessible_label(&self) -> Result<Option<String>>;
    /// 可见文本（innerText）
    async fn visible_text(&self) -> Result<String>;
    /// 当前值
    async fn value(&self) -> Result<String>;
    /// 写入值
    async fn set_value(&self, value: &str) -> Result<()>;
    async fn click(&self) -> Result<()>;
    async fn is_visible(&self) -> Result<bool>;
    async fn is_enabled(&self) -> Result<bool>;
    /// 在当前元素内部按角色查询
    async fn query_all(&self, role: ControlRole) -> Result<Vec<Self>>;
    /// 所在列表项的完整文本；不在列表项内时为空
    async fn enclosing_item_text(&self) -> Result<String>;

    /// 无障碍标签，缺失时退回可见文本
    async fn label_or_text(&self) -> Result<String> {
        match self.accessible_label().await? {
            Some(label) => Ok(label),
            None => Ok(self.visible_text().await?.trim().to_string()),
        }
    }

    /// 可见且可用；查询失败视为不可用
    async fn is_interactable(&self) -> bool {
        matches!(self.is_visible().await, Ok(true)) && matches!(self.is_enabled().await, Ok(true))
    }
}

/// 已加载（或待加载）的表单文档
#[async_trait]
pub trait FormDocument: Send + Sync + Sized {
    type Element: FormElement;

    /// 在页面脚本运行前把令牌写入 localStorage
    async fn inject_access_token(&self, token: &str) -> Result<()>;
    /// 导航到目标地址，超时即失败
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()>;
    async fn query_all(&self, role: ControlRole) -> Result<Vec<Self::Element>>;
    /// 整页截图
    async fn screenshot(&self, path: &Path) -> Result<()>;
    /// 释放会话
    async fn close(self) -> Result<()>;
}

/// 文档会话提供者
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    type Document: FormDocument;

    async fn launch(&self) -> Result<Self::Document>;
}

/// 按行切分元素文本，去掉空白行
pub fn text_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

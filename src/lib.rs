//! # Form Autofill
//!
//! 自动填写在线选择题表单的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 文档能力接口（`FormDocument` / `FormElement`）
//! - `PageDocument` - 基于 chromiumoxide 的唯一 page owner
//! - `browser/` - 启动或连接浏览器
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `QuestionExtractor` - 提取题目和选项
//! - `PromptBuilder` / `AnswerGenerator` - 构建 prompt、请求模型
//! - `answer_parser` / `hallucination_filter` - 解析并过滤答案
//! - `FieldInjector` - 按控件族写回答案
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个表单"的完整处理流程
//! - `SessionCtx` - 上下文封装（表单地址 + 当前阶段）
//! - `FormFlow` - 流程编排（navigate → extract → answer → inject → capture → submit）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/session_runner` - 管理浏览器生命周期，保证会话关闭
//!
//! `text/` 和 `models/` 是各层共用的纯逻辑与数据结构。

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod text;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, Pacing};
pub use error::AppError;
pub use infrastructure::{FormDocument, FormElement, PageDocument, SessionLauncher};
pub use models::{AnswerMap, FilledSet, QuestionItem, QuestionSet};
pub use orchestrator::{run_session, App};
pub use text::{normalize, TextRelation};
pub use workflow::{FormFlow, SessionReport, SubmitOutcome};

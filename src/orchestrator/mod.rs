//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 管理一次会话的资源生命周期：启动浏览器、交给流程层、无论成败都关闭。
//!
//! ## 层次关系
//!
//! ```text
//! session_runner (启动 / 关闭会话)
//!     ↓
//! workflow::FormFlow (一个表单的完整流程)
//!     ↓
//! services (能力层：extract / prompt / llm / parse / filter / inject)
//!     ↓
//! infrastructure (基础设施：FormDocument)
//! ```
//!
//! 只有编排层持有浏览器；流程层只借用文档。

pub mod session_runner;

pub use session_runner::{run_session, App};

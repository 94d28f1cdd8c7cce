//! 日志工具模块
//!
//! 提供日志初始化和格式化输出的辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::workflow::{SessionReport, SubmitOutcome};

/// 初始化 tracing 日志
///
/// `RUST_LOG` 优先；否则按 `verbose` 选择 debug 或 info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 表单自动填写启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 目标表单: {}", config.form_url);
    info!(
        "🤖 模型: {} ({:?} @ {})",
        config.llm_model_name, config.llm_backend, config.llm_api_base_url
    );
    info!("{}", "=".repeat(60));
}

/// 打印会话统计信息
pub fn print_session_summary(report: &SessionReport) {
    info!("\n{}", "=".repeat(60));
    info!("📊 会话完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("🔒 受限表单: {}", if report.restricted { "是" } else { "否" });
    info!("🧠 提取题目: {}", report.questions_extracted);
    info!("📥 解析答案: {}", report.answers_parsed);
    info!("🧹 过滤后保留: {}", report.answers_kept);
    info!("✍️ 已填写: {}", report.filled.len());
    let submit = match report.submit {
        SubmitOutcome::Submitted => "已自动提交",
        SubmitOutcome::ControlMissing => "未找到可点击的提交按钮",
        SubmitOutcome::LeftForManualSubmit => "受限表单，等待人工提交",
    };
    info!("📤 提交: {}", submit);
    if let Some(path) = &report.screenshot_path {
        info!("🖼️ 截图: {}", path);
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

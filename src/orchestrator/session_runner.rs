//! 会话运行器 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：校验配置、选择模型后端
//! 2. **资源管理**：启动（或连接）浏览器，确保每条路径都会关闭
//! 3. **向下委托**：委托 FormFlow 完成表单流程
//! 4. **统计输出**：打印会话结果

use anyhow::Result;
use tracing::{error, info, warn};

use crate::browser::ChromiumLauncher;
use crate::config::Config;
use crate::infrastructure::{FormDocument, SessionLauncher};
use crate::services::{build_generator, AnswerGenerator};
use crate::utils::logging;
use crate::workflow::{FormFlow, SessionReport, SessionState};

/// 应用主结构
pub struct App {
    config: Config,
    generator: Box<dyn AnswerGenerator>,
}

impl App {
    /// 初始化应用
    pub fn new(config: Config) -> Result<Self> {
        config.require_form_url()?;
        let generator = build_generator(&config);
        Ok(Self { config, generator })
    }

    /// 运行一次完整会话
    pub async fn run(&self) -> Result<SessionReport> {
        logging::log_startup(&self.config);

        let launcher = ChromiumLauncher::new(&self.config);
        let report = run_session(&launcher, &self.config, self.generator.as_ref()).await?;

        logging::print_session_summary(&report);
        Ok(report)
    }
}

/// 启动会话、执行流程、关闭会话
///
/// 流程失败时仍会关闭会话，再把错误交给调用方
pub async fn run_session<L: SessionLauncher>(
    launcher: &L,
    config: &Config,
    generator: &dyn AnswerGenerator,
) -> Result<SessionReport> {
    info!("▶ {}", SessionState::Launch);
    let document = launcher.launch().await.map_err(|e| {
        error!("❌ 浏览器启动失败: {}", e);
        e
    })?;

    let result = FormFlow::new(config, generator).run(&document).await;

    info!("▶ {}", SessionState::Close);
    if let Err(e) = document.close().await {
        warn!("⚠️ 关闭会话失败: {}", e);
    }

    match result {
        Ok(report) => Ok(report),
        Err(e) => {
            error!("❌ 会话中止: {}", e);
            Err(e)
        }
    }
}

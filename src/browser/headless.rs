use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::AppError;

/// 浏览器启动参数
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub headless: bool,
    pub chrome_executable: Option<String>,
    pub user_data_dir: Option<String>,
}

/// 启动浏览器并打开一个空白页面
///
/// 返回 (Browser, Page, 事件处理任务)
pub async fn launch_browser(options: &LaunchOptions) -> Result<(Browser, Page, JoinHandle<()>)> {
    info!(
        "🚀 启动浏览器 ({})...",
        if options.headless { "无头" } else { "有界面" }
    );

    let mut builder = BrowserConfig::builder();
    builder = if options.headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };
    if let Some(exe) = &options.chrome_executable {
        debug!("Chrome 路径: {}", exe);
        builder = builder.chrome_executable(exe);
    }
    if let Some(dir) = &options.user_data_dir {
        debug!("用户数据目录: {}", dir);
        builder = builder.user_data_dir(dir);
    }
    let config = builder
        .args(vec!["--start-maximized", "--disable-dev-shm-usage"])
        .build()
        .map_err(|e| {
            error!("配置浏览器失败: {}", e);
            AppError::browser_launch_failed(e)
        })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        AppError::browser_launch_failed(e)
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    let handler_task = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建页面失败: {}", e);
        AppError::browser_launch_failed(e)
    })?;

    info!("✅ 浏览器已就绪");
    Ok((browser, page, handler_task))
}

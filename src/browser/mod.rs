//! 浏览器会话的获取与释放

pub mod connection;
pub mod headless;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::Config;
use crate::infrastructure::{PageDocument, SessionLauncher};

pub use connection::connect_to_browser;
pub use headless::{launch_browser, LaunchOptions};

/// 基于 chromiumoxide 的会话提供者
///
/// 配置了调试端口时连接现有浏览器，否则启动新浏览器
pub struct ChromiumLauncher {
    debug_port: Option<u16>,
    options: LaunchOptions,
}

impl ChromiumLauncher {
    pub fn new(config: &Config) -> Self {
        Self {
            debug_port: config.browser_debug_port,
            options: LaunchOptions {
                headless: config.headless,
                chrome_executable: config.chrome_executable.clone(),
                user_data_dir: config.user_data_dir.clone(),
            },
        }
    }
}

#[async_trait]
impl SessionLauncher for ChromiumLauncher {
    type Document = PageDocument;

    async fn launch(&self) -> Result<PageDocument> {
        let document = match self.debug_port {
            Some(port) => {
                let (browser, page, task) = connect_to_browser(port).await?;
                PageDocument::new(browser, page, task, false)
            }
            None => {
                let (browser, page, task) = launch_browser(&self.options).await?;
                PageDocument::new(browser, page, task, true)
            }
        };
        Ok(document)
    }
}

use anyhow::Result;
use form_autofill::utils::logging;
use form_autofill::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let mut config = Config::load()?;

    // 命令行第一个参数可覆盖表单地址
    if let Some(url) = std::env::args().nth(1) {
        config.form_url = url;
    }

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::new(config)?.run().await?;

    Ok(())
}

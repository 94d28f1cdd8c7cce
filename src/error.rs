use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 启动浏览器失败
    #[error("启动浏览器失败: {source}")]
    LaunchFailed { source: BoxError },
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed { port: u16, source: BoxError },
    /// 导航超时（致命）
    #[error("导航到 {url} 超时 ({timeout_secs} 秒)")]
    NavigationTimeout { url: String, timeout_secs: u64 },
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed { url: String, source: BoxError },
    /// 执行脚本失败
    #[error("执行脚本失败: {source}")]
    ScriptExecutionFailed { source: BoxError },
    /// 截图失败
    #[error("截图保存到 {path} 失败: {source}")]
    ScreenshotFailed { path: String, source: BoxError },
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 网络请求失败
    #[error("LLM 请求失败 (模型: {model}): {source}")]
    RequestFailed { model: String, source: BoxError },
    /// 返回内容无法解码
    #[error("LLM 返回无法解码 (模型: {model}): {source}")]
    BadResponse { model: String, source: BoxError },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed { path: String, source: BoxError },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed { path: String, source: BoxError },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 未提供目标表单地址
    #[error("未提供表单 URL (命令行参数、FORM_URL 或配置文件)")]
    MissingFormUrl,
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器启动错误
    pub fn browser_launch_failed(source: impl Into<BoxError>) -> Self {
        AppError::Browser(BrowserError::LaunchFailed {
            source: source.into(),
        })
    }

    /// 创建浏览器连接错误
    pub fn browser_connection_failed(port: u16, source: impl Into<BoxError>) -> Self {
        AppError::Browser(BrowserError::ConnectionFailed {
            port,
            source: source.into(),
        })
    }

    /// 创建导航超时错误
    pub fn navigation_timeout(url: impl Into<String>, timeout_secs: u64) -> Self {
        AppError::Browser(BrowserError::NavigationTimeout {
            url: url.into(),
            timeout_secs,
        })
    }

    /// 创建导航失败错误
    pub fn navigation_failed(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        AppError::Browser(BrowserError::NavigationFailed {
            url: url.into(),
            source: source.into(),
        })
    }

    /// 创建脚本执行错误
    pub fn script_failed(source: impl Into<BoxError>) -> Self {
        AppError::Browser(BrowserError::ScriptExecutionFailed {
            source: source.into(),
        })
    }

    /// 创建截图错误
    pub fn screenshot_failed(path: impl Into<String>, source: impl Into<BoxError>) -> Self {
        AppError::Browser(BrowserError::ScreenshotFailed {
            path: path.into(),
            source: source.into(),
        })
    }

    /// 创建 LLM 请求错误
    pub fn llm_request_failed(model: impl Into<String>, source: impl Into<BoxError>) -> Self {
        AppError::Llm(LlmError::RequestFailed {
            model: model.into(),
            source: source.into(),
        })
    }

    /// 创建 LLM 解码错误
    pub fn llm_bad_response(model: impl Into<String>, source: impl Into<BoxError>) -> Self {
        AppError::Llm(LlmError::BadResponse {
            model: model.into(),
            source: source.into(),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: impl Into<BoxError>) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: source.into(),
        })
    }

    /// 创建 TOML 解析错误
    pub fn toml_parse_failed(path: impl Into<String>, source: impl Into<BoxError>) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: path.into(),
            source: source.into(),
        })
    }

    /// 是否为导航超时
    pub fn is_navigation_timeout(&self) -> bool {
        matches!(
            self,
            AppError::Browser(BrowserError::NavigationTimeout { .. })
        )
    }
}

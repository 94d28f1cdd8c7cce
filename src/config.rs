use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::{AppError, ConfigError};

/// 默认配置文件名（工作目录下存在时自动加载）
const DEFAULT_CONFIG_FILE: &str = "form_autofill.toml";

/// 答案生成后端
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    /// Ollama `/api/generate` 接口
    Ollama,
    /// 兼容 OpenAI 的 chat completion 接口
    OpenAi,
}

impl FromStr for LlmBackend {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAi),
            _ => Err(()),
        }
    }
}

/// 节奏控制：所有固定等待时间集中在这里
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pacing {
    /// 受限表单等待人工登录
    pub restricted_login_wait: Duration,
    /// 单选点击后的稳定等待
    pub post_click_settle: Duration,
    /// 下拉框展开后的稳定等待
    pub dropdown_open_settle: Duration,
    /// 提交前等待
    pub pre_submit_settle: Duration,
    /// 提交后等待
    pub post_submit_settle: Duration,
    /// 受限表单等待人工提交
    pub restricted_submit_wait: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            restricted_login_wait: Duration::from_secs(30),
            post_click_settle: Duration::from_millis(300),
            dropdown_open_settle: Duration::from_millis(500),
            pre_submit_settle: Duration::from_secs(15),
            post_submit_settle: Duration::from_secs(50),
            restricted_submit_wait: Duration::from_secs(30),
        }
    }
}

impl Pacing {
    /// 全部为零的等待，测试用
    pub fn instant() -> Self {
        Self {
            restricted_login_wait: Duration::ZERO,
            post_click_settle: Duration::ZERO,
            dropdown_open_settle: Duration::ZERO,
            pre_submit_settle: Duration::ZERO,
            post_submit_settle: Duration::ZERO,
            restricted_submit_wait: Duration::ZERO,
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 目标表单 URL
    pub form_url: String,
    /// 导航前注入 localStorage 的访问令牌
    pub access_token: Option<String>,
    /// 设置后连接到已运行的浏览器，而不是启动新浏览器
    pub browser_debug_port: Option<u16>,
    /// Chrome 可执行文件路径
    pub chrome_executable: Option<String>,
    /// 持久化的浏览器用户目录
    pub user_data_dir: Option<String>,
    /// 是否无头模式
    pub headless: bool,
    /// 截图保存路径
    pub screenshot_path: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_backend: LlmBackend,
    pub llm_api_base_url: String,
    pub llm_api_key: String,
    pub llm_model_name: String,
    /// 页面导航超时
    pub navigation_timeout: Duration,
    pub pacing: Pacing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            form_url: String::new(),
            access_token: None,
            browser_debug_port: None,
            chrome_executable: None,
            user_data_dir: None,
            headless: false,
            screenshot_path: "form-preview.png".to_string(),
            verbose_logging: false,
            llm_backend: LlmBackend::Ollama,
            llm_api_base_url: "http://localhost:11434".to_string(),
            llm_api_key: String::new(),
            llm_model_name: "mistral".to_string(),
            navigation_timeout: Duration::from_secs(80),
            pacing: Pacing::default(),
        }
    }
}

/// TOML 配置文件的结构，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    form_url: Option<String>,
    access_token: Option<String>,
    browser_debug_port: Option<u16>,
    chrome_executable: Option<String>,
    user_data_dir: Option<String>,
    headless: Option<bool>,
    screenshot_path: Option<String>,
    verbose_logging: Option<bool>,
    llm_backend: Option<LlmBackend>,
    llm_api_base_url: Option<String>,
    llm_api_key: Option<String>,
    llm_model_name: Option<String>,
    navigation_timeout_secs: Option<u64>,
    pacing: FilePacing,
}

/// 文件中的等待时间，单位毫秒
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FilePacing {
    restricted_login_wait_ms: Option<u64>,
    post_click_settle_ms: Option<u64>,
    dropdown_open_settle_ms: Option<u64>,
    pre_submit_settle_ms: Option<u64>,
    post_submit_settle_ms: Option<u64>,
    restricted_submit_wait_ms: Option<u64>,
}

impl Config {
    /// 加载配置：默认值 → TOML 文件（可选）→ 环境变量
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        let explicit = std::env::var("FORM_AUTOFILL_CONFIG").ok();
        let path = explicit.clone().unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
        if explicit.is_some() || Path::new(&path).exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| AppError::file_read_failed(&path, e))
                .with_context(|| format!("无法读取配置文件: {}", path))?;
            config.apply_toml(&content, &path)?;
        }

        config.apply_env()?;
        Ok(config)
    }

    /// 用 TOML 文本覆盖当前配置
    pub fn apply_toml(&mut self, content: &str, path: &str) -> Result<()> {
        let file: FileConfig =
            toml::from_str(content).map_err(|e| AppError::toml_parse_failed(path, e))?;

        if let Some(v) = file.form_url {
            self.form_url = v;
        }
        if let Some(v) = file.headless {
            self.headless = v;
        }
        if let Some(v) = file.screenshot_path {
            self.screenshot_path = v;
        }
        if let Some(v) = file.verbose_logging {
            self.verbose_logging = v;
        }
        if let Some(v) = file.llm_backend {
            self.llm_backend = v;
        }
        if let Some(v) = file.llm_api_base_url {
            self.llm_api_base_url = v;
        }
        if let Some(v) = file.llm_api_key {
            self.llm_api_key = v;
        }
        if let Some(v) = file.llm_model_name {
            self.llm_model_name = v;
        }
        if file.access_token.is_some() {
            self.access_token = file.access_token;
        }
        if file.browser_debug_port.is_some() {
            self.browser_debug_port = file.browser_debug_port;
        }
        if file.chrome_executable.is_some() {
            self.chrome_executable = file.chrome_executable;
        }
        if file.user_data_dir.is_some() {
            self.user_data_dir = file.user_data_dir;
        }
        if let Some(secs) = file.navigation_timeout_secs {
            self.navigation_timeout = Duration::from_secs(secs);
        }

        let p = &file.pacing;
        let pacing = &mut self.pacing;
        for (slot, ms) in [
            (&mut pacing.restricted_login_wait, p.restricted_login_wait_ms),
            (&mut pacing.post_click_settle, p.post_click_settle_ms),
            (&mut pacing.dropdown_open_settle, p.dropdown_open_settle_ms),
            (&mut pacing.pre_submit_settle, p.pre_submit_settle_ms),
            (&mut pacing.post_submit_settle, p.post_submit_settle_ms),
            (&mut pacing.restricted_submit_wait, p.restricted_submit_wait_ms),
        ] {
            if let Some(ms) = ms {
                *slot = Duration::from_millis(ms);
            }
        }
        Ok(())
    }

    /// 用环境变量覆盖当前配置
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(v) = std::env::var("FORM_URL") {
            self.form_url = v;
        }
        if let Ok(v) = std::env::var("ACCESS_TOKEN") {
            self.access_token = Some(v);
        }
        if let Some(port) = parse_env::<u16>("BROWSER_DEBUG_PORT", "u16")? {
            self.browser_debug_port = Some(port);
        }
        if let Ok(v) = std::env::var("CHROME_EXECUTABLE") {
            self.chrome_executable = Some(v);
        }
        if let Ok(v) = std::env::var("USER_DATA_DIR") {
            self.user_data_dir = Some(v);
        }
        if let Some(v) = parse_env::<bool>("HEADLESS", "bool")? {
            self.headless = v;
        }
        if let Ok(v) = std::env::var("SCREENSHOT_PATH") {
            self.screenshot_path = v;
        }
        if let Some(v) = parse_env::<bool>("VERBOSE_LOGGING", "bool")? {
            self.verbose_logging = v;
        }
        if let Some(v) = parse_env::<LlmBackend>("LLM_BACKEND", "ollama|openai")? {
            self.llm_backend = v;
        }
        if let Ok(v) = std::env::var("LLM_API_BASE_URL") {
            self.llm_api_base_url = v;
        }
        if let Ok(v) = std::env::var("LLM_API_KEY") {
            self.llm_api_key = v;
        }
        if let Ok(v) = std::env::var("LLM_MODEL_NAME") {
            self.llm_model_name = v;
        }
        if let Some(secs) = parse_env::<u64>("NAVIGATION_TIMEOUT_SECS", "u64")? {
            self.navigation_timeout = Duration::from_secs(secs);
        }
        Ok(())
    }

    /// 确认目标 URL 已配置
    pub fn require_form_url(&self) -> Result<&str> {
        if self.form_url.trim().is_empty() {
            return Err(AppError::Config(ConfigError::MissingFormUrl).into());
        }
        Ok(&self.form_url)
    }
}

fn parse_env<T: FromStr>(var_name: &str, expected_type: &str) -> Result<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse::<T>().map(Some).map_err(|_| {
            AppError::Config(ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            })
            .into()
        }),
        Err(_) => Ok(None),
    }
}

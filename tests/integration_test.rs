//! 真实浏览器端到端测试
//!
//! 需要本机安装 Chrome/Chromium，默认忽略：cargo test -- --ignored

use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use form_autofill::browser::ChromiumLauncher;
use form_autofill::infrastructure::{ControlRole, FormDocument, FormElement, SessionLauncher};
use form_autofill::services::{AnswerGenerator, ModelResponse, QuestionExtractor};
use form_autofill::{run_session, Config, Pacing, SubmitOutcome};

const QUIZ_PAGE: &str = r#"data:text/html,<html><body>
<div role="listitem">1. Pick a colour
  <div role="radio" aria-label="A. Red" onclick="this.dataset.picked=1">A. Red</div>
  <div role="radio" aria-label="B. Blue" onclick="document.title='blue'">B. Blue</div>
</div>
<div role="listitem">Your name <input type="text" aria-label="Your name"></div>
<div role="button" onclick="document.body.dataset.sent=1">Submit</div>
</body></html>"#;

/// 固定回答并记录 prompt
struct FixedGenerator {
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl AnswerGenerator for FixedGenerator {
    fn model_name(&self) -> &str {
        "fixed"
    }

    async fn generate(&self, prompt: &str) -> Result<ModelResponse> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(ModelResponse::Text("B".to_string()))
    }
}

fn headless_config() -> Config {
    Config {
        form_url: QUIZ_PAGE.to_string(),
        headless: true,
        screenshot_path: std::env::temp_dir()
            .join("form-autofill-preview.png")
            .display()
            .to_string(),
        pacing: Pacing::instant(),
        ..Config::default()
    }
}

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_extract_from_real_page() {
    let config = headless_config();
    let document = ChromiumLauncher::new(&config).launch().await.expect("启动浏览器失败");
    document
        .navigate(&config.form_url, config.navigation_timeout)
        .await
        .expect("打开页面失败");

    let questions = QuestionExtractor::new().extract(&document).await.expect("提取失败");
    let buttons = document.query_all(ControlRole::Button).await.expect("查询失败");
    let button_text = buttons[0].visible_text().await.expect("读取失败");

    document.close().await.expect("关闭失败");

    assert_eq!(questions.keys().collect::<Vec<_>>(), vec!["pick a colour"]);
    assert_eq!(questions.get("pick a colour").unwrap().options, vec!["A. Red", "B. Blue"]);
    assert!(button_text.contains("Submit"));
}

#[tokio::test]
#[ignore]
async fn test_full_session_on_real_page() {
    let config = headless_config();
    let launcher = ChromiumLauncher::new(&config);
    let generator = FixedGenerator {
        prompts: Mutex::new(Vec::new()),
    };

    let report = run_session(&launcher, &config, &generator)
        .await
        .expect("会话应该成功");

    assert!(!report.restricted);
    assert!(report.filled.contains("pick a colour"));
    assert_eq!(report.submit, SubmitOutcome::Submitted);
    assert!(report.screenshot_path.is_some());
    assert_eq!(generator.prompts.lock().unwrap().len(), 1);
}

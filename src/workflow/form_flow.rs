//! 表单填写流程 - 流程层
//!
//! 核心职责：定义"一个表单"从打开到提交的完整流程
//!
//! 流程顺序：
//! 1. 注入令牌 → 打开表单 → 检测登录限制
//! 2. 提取题目 → 构建 prompt → 请求模型 → 解析 → 过滤
//! 3. 填写 → 截图 → 公开表单自动提交 / 受限表单等待人工提交
//!
//! 不持有任何资源（document 由编排层启动和关闭）

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::config::{Config, Pacing};
use crate::infrastructure::{ControlRole, FormDocument, FormElement};
use crate::models::{AnswerMap, FilledSet};
use crate::services::{
    filter_hallucinations, parse_response, AnswerGenerator, FieldInjector, PromptBuilder,
    QuestionExtractor,
};
use crate::workflow::session_ctx::SessionCtx;
use crate::workflow::session_state::SessionState;

/// 提交按钮上的文字（小写比较）
const SUBMIT_LABEL: &str = "submit";

/// aria-label 或可见文本中含 "submit"（大小写不敏感）
async fn is_submit_control<E: FormElement>(control: &E) -> bool {
    let label = control.accessible_label().await.ok().flatten().unwrap_or_default();
    let text = control.visible_text().await.unwrap_or_default();
    [label, text]
        .iter()
        .any(|s| s.to_lowercase().contains(SUBMIT_LABEL))
}

/// 提交阶段的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 已自动点击提交
    Submitted,
    /// 没有找到可点击的提交按钮
    ControlMissing,
    /// 受限表单，留给用户手动提交
    LeftForManualSubmit,
}

/// 一次会话的结果汇总
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub restricted: bool,
    pub questions_extracted: usize,
    pub answers_parsed: usize,
    pub answers_kept: usize,
    pub filled: FilledSet,
    pub submit: SubmitOutcome,
    /// 截图成功时的路径
    pub screenshot_path: Option<String>,
}

/// 表单填写流程
///
/// - 编排完整的填写流程，决定何时等待、何时提交
/// - 只依赖业务能力（services）和文档能力接口
pub struct FormFlow<'a> {
    extractor: QuestionExtractor,
    prompt_builder: PromptBuilder,
    generator: &'a dyn AnswerGenerator,
    form_url: String,
    access_token: Option<String>,
    navigation_timeout: Duration,
    screenshot_path: PathBuf,
    pacing: Pacing,
}

impl<'a> FormFlow<'a> {
    pub fn new(config: &Config, generator: &'a dyn AnswerGenerator) -> Self {
        Self {
            extractor: QuestionExtractor::new(),
            prompt_builder: PromptBuilder::new(),
            generator,
            form_url: config.form_url.clone(),
            access_token: config.access_token.clone(),
            navigation_timeout: config.navigation_timeout,
            screenshot_path: PathBuf::from(&config.screenshot_path),
            pacing: config.pacing.clone(),
        }
    }

    /// 在已启动的文档上跑完整个流程
    ///
    /// 只有导航失败、文档查询失败和模型请求失败会返回错误
    pub async fn run<D: FormDocument>(&self, document: &D) -> Result<SessionReport> {
        let mut ctx = SessionCtx::new(&self.form_url);

        // ========== 打开表单 ==========
        ctx.advance(SessionState::Navigate);
        if let Some(token) = &self.access_token {
            document.inject_access_token(token).await?;
            info!("{} 🔑 已注入访问令牌", ctx);
        }
        document.navigate(&self.form_url, self.navigation_timeout).await?;

        // ========== 检测登录限制 ==========
        ctx.advance(SessionState::DetectRestriction);
        ctx.restricted = !document.query_all(ControlRole::EmailInput).await?.is_empty();
        if ctx.restricted {
            info!(
                "{} 🔐 检测到受限表单，等待 {:?} 供人工登录...",
                ctx, self.pacing.restricted_login_wait
            );
            tokio::time::sleep(self.pacing.restricted_login_wait).await;
        } else {
            info!("{} 🌍 公开表单", ctx);
        }

        // ========== 提取题目 ==========
        ctx.advance(SessionState::Extract);
        let questions = self.extractor.extract(document).await?;

        let mut answers = if questions.is_empty() {
            warn!("{} ⚠️ 没有可作答的题目，跳过模型请求", ctx);
            AnswerMap::new()
        } else {
            ctx.advance(SessionState::BuildPrompt);
            let prompt = self.prompt_builder.build(&questions);

            ctx.advance(SessionState::RequestAnswers);
            info!("{} 🤖 请求模型 {} 作答...", ctx, self.generator.model_name());
            let response = self.generator.generate(&prompt).await?;

            ctx.advance(SessionState::ParseAnswers);
            parse_response(&response, &questions)
        };
        let answers_parsed = answers.len();

        ctx.advance(SessionState::FilterHallucinations);
        filter_hallucinations(&mut answers, &questions);
        let answers_kept = answers.len();

        // ========== 填写 ==========
        ctx.advance(SessionState::InjectAnswers);
        let filled = FieldInjector::new(&self.pacing).inject(document, &answers).await;
        info!("{} ✍️ 已填写 {}/{} 道题", ctx, filled.len(), answers_kept);

        // ========== 截图 ==========
        ctx.advance(SessionState::Capture);
        let screenshot_path = match document.screenshot(&self.screenshot_path).await {
            Ok(()) => {
                info!("{} 🖼️ 预览已保存: {}", ctx, self.screenshot_path.display());
                Some(self.screenshot_path.display().to_string())
            }
            Err(e) => {
                error!("{} ❌ 截图失败: {}", ctx, e);
                None
            }
        };

        // ========== 提交 ==========
        ctx.advance(SessionState::Submit);
        let submit = if ctx.restricted {
            info!("{} 🔒 受限表单，需用户手动提交", ctx);
            tokio::time::sleep(self.pacing.restricted_submit_wait).await;
            SubmitOutcome::LeftForManualSubmit
        } else {
            tokio::time::sleep(self.pacing.pre_submit_settle).await;
            let outcome = self.click_submit(document).await;
            tokio::time::sleep(self.pacing.post_submit_settle).await;
            outcome
        };

        Ok(SessionReport {
            restricted: ctx.restricted,
            questions_extracted: questions.len(),
            answers_parsed,
            answers_kept,
            filled,
            submit,
            screenshot_path,
        })
    }

    /// 点击第一个标签或文字含 "Submit" 的按钮；找不到或不可点击时不重试
    async fn click_submit<D: FormDocument>(&self, document: &D) -> SubmitOutcome {
        let buttons = match document.query_all(ControlRole::Button).await {
            Ok(buttons) => buttons,
            Err(e) => {
                warn!("❌ 查找提交按钮失败: {}", e);
                return SubmitOutcome::ControlMissing;
            }
        };

        let mut submit_button = None;
        for button in buttons {
            if is_submit_control(&button).await {
                submit_button = Some(button);
                break;
            }
        }

        let Some(button) = submit_button else {
            warn!("⚠️ 没有找到提交按钮");
            return SubmitOutcome::ControlMissing;
        };
        if !button.is_interactable().await {
            warn!("⚠️ 提交按钮不可见或不可用");
            return SubmitOutcome::ControlMissing;
        }

        match button.click().await {
            Ok(()) => {
                info!("✅ 表单已自动提交");
                SubmitOutcome::Submitted
            }
            Err(e) => {
                warn!("❌ 提交失败: {}", e);
                SubmitOutcome::ControlMissing
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::AppError;
    use crate::infrastructure::fake::{FakeDocument, FakeElement};
    use crate::services::ModelResponse;

    /// 返回固定输出并记录收到的 prompt
    struct ScriptedGenerator {
        response: ModelResponse,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(response: ModelResponse) -> Self {
            Self {
                response,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl AnswerGenerator for ScriptedGenerator {
        fn model_name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, prompt: &str) -> Result<ModelResponse> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.response.clone())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl AnswerGenerator for FailingGenerator {
        fn model_name(&self) -> &str {
            "offline"
        }

        async fn generate(&self, _prompt: &str) -> Result<ModelResponse> {
            Err(AppError::llm_request_failed("offline", "connection refused").into())
        }
    }

    fn test_config() -> Config {
        Config {
            form_url: "https://forms.example/quiz".to_string(),
            screenshot_path: "preview-test.png".to_string(),
            pacing: Pacing::instant(),
            ..Config::default()
        }
    }

    fn colour_item(blue: &FakeElement) -> FakeElement {
        FakeElement::item(
            &["1. Pick a colour", "A. Red", "B. Blue"],
            vec![FakeElement::radio("A. Red"), blue.clone()],
        )
    }

    #[tokio::test]
    async fn test_public_form_is_filled_and_submitted() {
        let blue = FakeElement::radio("B. Blue");
        let submit = FakeElement::button("Submit");
        let document = FakeDocument::new(vec![colour_item(&blue), submit.clone()]);
        let generator = ScriptedGenerator::new(ModelResponse::Text("B".to_string()));

        let report = FormFlow::new(&test_config(), &generator).run(&document).await.unwrap();

        assert!(!report.restricted);
        assert_eq!(report.questions_extracted, 1);
        assert_eq!(report.answers_kept, 1);
        assert_eq!(blue.clicks(), 1);
        assert_eq!(submit.clicks(), 1);
        assert_eq!(report.submit, SubmitOutcome::Submitted);
        assert_eq!(report.screenshot_path.as_deref(), Some("preview-test.png"));
        assert_eq!(
            *document.navigations.lock().unwrap(),
            vec!["https://forms.example/quiz".to_string()]
        );
    }

    #[tokio::test]
    async fn test_restricted_form_is_never_auto_submitted() {
        let blue = FakeElement::radio("B. Blue");
        let submit = FakeElement::button("Submit");
        let document = FakeDocument::new(vec![
            FakeElement::email_input(),
            colour_item(&blue),
            submit.clone(),
        ]);
        let generator = ScriptedGenerator::new(ModelResponse::Text("B".to_string()));

        let report = FormFlow::new(&test_config(), &generator).run(&document).await.unwrap();

        assert!(report.restricted);
        assert_eq!(blue.clicks(), 1);
        assert_eq!(submit.clicks(), 0);
        assert_eq!(report.submit, SubmitOutcome::LeftForManualSubmit);
    }

    #[tokio::test]
    async fn test_unusable_response_still_captures_and_submits() {
        let blue = FakeElement::radio("B. Blue");
        let submit = FakeElement::button("Submit");
        let document = FakeDocument::new(vec![colour_item(&blue), submit.clone()]);
        let generator = ScriptedGenerator::new(ModelResponse::Unusable);

        let report = FormFlow::new(&test_config(), &generator).run(&document).await.unwrap();

        assert_eq!(report.answers_parsed, 0);
        assert!(report.filled.is_empty());
        assert_eq!(blue.clicks(), 0);
        assert_eq!(document.screenshots.lock().unwrap().len(), 1);
        assert_eq!(report.submit, SubmitOutcome::Submitted);
    }

    #[tokio::test]
    async fn test_missing_or_disabled_submit_is_reported() {
        let generator = ScriptedGenerator::new(ModelResponse::Text("B".to_string()));

        let document = FakeDocument::new(vec![FakeElement::button("Next")]);
        let report = FormFlow::new(&test_config(), &generator).run(&document).await.unwrap();
        assert_eq!(report.submit, SubmitOutcome::ControlMissing);

        let disabled = FakeElement::button("Submit").disabled();
        let document = FakeDocument::new(vec![disabled.clone()]);
        let report = FormFlow::new(&test_config(), &generator).run(&document).await.unwrap();
        assert_eq!(report.submit, SubmitOutcome::ControlMissing);
        assert_eq!(disabled.clicks(), 0);
        assert_eq!(document.screenshots.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_control_matches_label_or_text_in_any_case() {
        let generator = ScriptedGenerator::new(ModelResponse::Unusable);

        let lower = FakeElement::button("submit form");
        let document = FakeDocument::new(vec![FakeElement::button("Next"), lower.clone()]);
        let report = FormFlow::new(&test_config(), &generator).run(&document).await.unwrap();
        assert_eq!(report.submit, SubmitOutcome::Submitted);
        assert_eq!(lower.clicks(), 1);

        let icon_only = FakeElement::labelled_button("SUBMIT", "");
        let document = FakeDocument::new(vec![icon_only.clone()]);
        let report = FormFlow::new(&test_config(), &generator).run(&document).await.unwrap();
        assert_eq!(report.submit, SubmitOutcome::Submitted);
        assert_eq!(icon_only.clicks(), 1);
    }

    #[tokio::test]
    async fn test_no_questions_skips_model_request() {
        let generator = ScriptedGenerator::new(ModelResponse::Text("A".to_string()));
        let document = FakeDocument::new(vec![FakeElement::item(
            &["Your name"],
            vec![FakeElement::text_input(Some("Your name"))],
        )]);

        let report = FormFlow::new(&test_config(), &generator).run(&document).await.unwrap();

        assert_eq!(generator.calls(), 0);
        assert_eq!(report.questions_extracted, 0);
    }

    #[tokio::test]
    async fn test_access_token_is_injected_before_navigation() {
        let generator = ScriptedGenerator::new(ModelResponse::Unusable);
        let document = FakeDocument::new(vec![]);
        let config = Config {
            access_token: Some("opaque-token".to_string()),
            ..test_config()
        };

        FormFlow::new(&config, &generator).run(&document).await.unwrap();

        assert_eq!(*document.tokens.lock().unwrap(), vec!["opaque-token".to_string()]);
    }

    #[tokio::test]
    async fn test_navigation_timeout_and_model_failure_are_fatal() {
        let generator = ScriptedGenerator::new(ModelResponse::Unusable);
        let document = FakeDocument::new(vec![]).hanging();
        let err = FormFlow::new(&test_config(), &generator).run(&document).await.unwrap_err();
        assert!(err.downcast_ref::<AppError>().is_some_and(AppError::is_navigation_timeout));
        assert!(document.screenshots.lock().unwrap().is_empty());

        let blue = FakeElement::radio("B. Blue");
        let document = FakeDocument::new(vec![colour_item(&blue)]);
        let err = FormFlow::new(&test_config(), &FailingGenerator).run(&document).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::Llm(_))));
    }
}

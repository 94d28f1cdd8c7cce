use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{first_line, resolve_answer, ControlFamily, FillStrategy};
use crate::infrastructure::{ControlRole, FormDocument, FormElement};
use crate::models::{AnswerMap, FilledSet};
use crate::services::question_extractor::strip_number_prefix;
use crate::text::{is_personal, normalize};

/// 文本框 / 多行文本框填写
pub struct FreeTextFill;

impl FreeTextFill {
    pub fn new() -> Self {
        Self
    }

    /// 控件对应的题目 key：aria-label，否则所在列表项的第一行
    async fn control_key<E: FormElement>(control: &E) -> Result<(String, bool)> {
        if let Some(label) = control.accessible_label().await? {
            return Ok((normalize(&label), is_personal(&label)));
        }
        let item_text = control.enclosing_item_text().await?;
        let line = first_line(&item_text);
        let key = normalize(strip_number_prefix(&line));
        let personal = is_personal(&key);
        Ok((key, personal))
    }

    async fn fill_one<E: FormElement>(
        &self,
        control: &E,
        answers: &AnswerMap,
        filled: &mut FilledSet,
    ) -> Result<()> {
        let (key, personal) = Self::control_key(control).await?;
        if personal {
            debug!("🔒 跳过个人信息输入框: {}", key);
            return Ok(());
        }

        let Some((question, answer, relation)) = resolve_answer(&key, answers) else {
            debug!("⚠️ 输入框没有对应答案: {}", key);
            return Ok(());
        };

        if !control.is_interactable().await {
            debug!("🚫 输入框不可见或不可用: {}", key);
            return Ok(());
        }

        if control.value().await? == answer {
            debug!("✔️ 已是目标值，跳过写入: {}", question);
            filled.record(question);
            return Ok(());
        }

        control.set_value(answer).await?;
        filled.record(question);
        info!("✍️ 已填写输入框 ({}): {} → {}", relation, question, answer);
        Ok(())
    }
}

impl Default for FreeTextFill {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<D: FormDocument> FillStrategy<D> for FreeTextFill {
    fn family(&self) -> ControlFamily {
        ControlFamily::FreeText
    }

    async fn fill(&self, document: &D, answers: &AnswerMap, filled: &mut FilledSet) -> Result<()> {
        let controls = document.query_all(ControlRole::TextEntry).await?;
        debug!("找到 {} 个输入框", controls.len());

        for control in &controls {
            if let Err(e) = self.fill_one(control, answers, filled).await {
                warn!("⚠️ 输入框填写失败: {}", e);
            }
        }
        Ok(())
    }
}

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{resolve_answer, ControlFamily, FillStrategy};
use crate::infrastructure::{ControlRole, FormDocument, FormElement};
use crate::models::{AnswerMap, FilledSet};
use crate::text::{normalize, TextRelation};
use crate::utils::truncate_text;

/// 下拉框填写：展开后点击与答案相关的第一个选项
pub struct DropdownFill {
    settle: Duration,
}

impl DropdownFill {
    /// `settle`：展开下拉框后的等待
    pub fn new(settle: Duration) -> Self {
        Self { settle }
    }

    async fn fill_one<E: FormElement>(
        &self,
        dropdown: &E,
        answers: &AnswerMap,
        filled: &mut FilledSet,
    ) -> Result<()> {
        let item_text = dropdown.enclosing_item_text().await?;
        let Some((question, answer, _)) = resolve_answer(&normalize(&item_text), answers) else {
            debug!("⚠️ 下拉框没有对应答案: {}", truncate_text(&item_text, 60));
            return Ok(());
        };
        debug!("✅ 下拉框对应题目: {} → {}", question, answer);

        if !dropdown.is_interactable().await {
            debug!("🚫 跳过隐藏或不可用的下拉框: {}", question);
            return Ok(());
        }

        dropdown.click().await?;
        tokio::time::sleep(self.settle).await;

        let answer_key = normalize(answer);
        for option in dropdown.query_all(ControlRole::ListboxOption).await? {
            let label = option.label_or_text().await?;
            if TextRelation::between(&normalize(&label), &answer_key).is_some() {
                option.click().await?;
                filled.record(question);
                info!("🔽 已选择下拉选项: {}", label);
                return Ok(());
            }
        }

        debug!("⚠️ 没有匹配的下拉选项: {}", answer);
        Ok(())
    }
}

#[async_trait]
impl<D: FormDocument> FillStrategy<D> for DropdownFill {
    fn family(&self) -> ControlFamily {
        ControlFamily::Dropdown
    }

    async fn fill(&self, document: &D, answers: &AnswerMap, filled: &mut FilledSet) -> Result<()> {
        let dropdowns = document.query_all(ControlRole::Listbox).await?;
        debug!("找到 {} 个下拉框", dropdowns.len());

        for dropdown in &dropdowns {
            if let Err(e) = self.fill_one(dropdown, answers, filled).await {
                warn!("⚠️ 下拉框填写失败: {}", e);
            }
        }
        Ok(())
    }
}

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{first_line, ControlFamily, FillStrategy};
use crate::infrastructure::{ControlRole, FormDocument, FormElement};
use crate::models::{AnswerMap, FilledSet};
use crate::text::{normalize, TextRelation};

/// 把答案按 `,` / `;` 拆成期望勾选的标签集合
pub fn expected_labels(answer: &str) -> Vec<String> {
    answer
        .split([',', ';'])
        .map(normalize)
        .filter(|label| !label.is_empty())
        .collect()
}

/// 复选填写：勾选所有在期望集合中的复选框
pub struct CheckboxFill;

impl CheckboxFill {
    pub fn new() -> Self {
        Self
    }

    /// 返回本列表项中点击的数量
    async fn check_in_item<E: FormElement>(&self, item: &E, expected: &[String]) -> Result<usize> {
        let mut clicked = 0;
        for checkbox in item.query_all(ControlRole::Checkbox).await? {
            let label = checkbox.label_or_text().await?;
            if !expected.contains(&normalize(&label)) {
                continue;
            }
            if !checkbox.is_interactable().await {
                continue;
            }

            checkbox.click().await?;
            clicked += 1;
            info!("☑️ 已勾选: {}", label);
        }
        Ok(clicked)
    }
}

impl Default for CheckboxFill {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<D: FormDocument> FillStrategy<D> for CheckboxFill {
    fn family(&self) -> ControlFamily {
        ControlFamily::Checkbox
    }

    async fn fill(&self, document: &D, answers: &AnswerMap, filled: &mut FilledSet) -> Result<()> {
        for (question, answer) in answers.iter() {
            let expected = expected_labels(answer);
            let items = match document.query_all(ControlRole::ListItem).await {
                Ok(items) => items,
                Err(e) => {
                    warn!("⚠️ 查询列表项失败，跳过: {}: {}", question, e);
                    continue;
                }
            };

            for item in &items {
                let header = match item.visible_text().await {
                    Ok(text) => normalize(&first_line(&text)),
                    Err(e) => {
                        warn!("⚠️ 读取列表项失败: {}", e);
                        continue;
                    }
                };
                if TextRelation::between(&header, question).is_none() {
                    continue;
                }

                match self.check_in_item(item, &expected).await {
                    Ok(0) => debug!("⚠️ 没有匹配的复选框: {} → {}", question, answer),
                    Ok(_) => filled.record(question),
                    Err(e) => warn!("⚠️ 复选框点击失败: {}: {}", question, e),
                }
            }
        }
        Ok(())
    }
}

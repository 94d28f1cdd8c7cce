use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{numbered_or_first_line, ControlFamily, FillStrategy};
use crate::infrastructure::{ControlRole, FormDocument, FormElement};
use crate::models::{AnswerMap, FilledSet};
use crate::text::{normalize, TextRelation};

/// 单选填写
pub struct RadioFill {
    settle: Duration,
}

impl RadioFill {
    /// `settle`：每次点击后的等待
    pub fn new(settle: Duration) -> Self {
        Self { settle }
    }

    /// 在一个列表项内点击与答案相关的第一个可用单选；返回是否点击
    async fn select_in_item<E: FormElement>(&self, item: &E, answer: &str) -> Result<bool> {
        let answer_key = normalize(answer);

        for radio in item.query_all(ControlRole::Radio).await? {
            let label = radio.label_or_text().await?;
            if TextRelation::between(&normalize(&label), &answer_key).is_none() {
                continue;
            }
            if !radio.is_interactable().await {
                continue;
            }

            radio.click().await?;
            tokio::time::sleep(self.settle).await;
            info!("🔘 已选择单选: {}", label);
            return Ok(true);
        }
        Ok(false)
    }
}

#[async_trait]
impl<D: FormDocument> FillStrategy<D> for RadioFill {
    fn family(&self) -> ControlFamily {
        ControlFamily::Radio
    }

    async fn fill(&self, document: &D, answers: &AnswerMap, filled: &mut FilledSet) -> Result<()> {
        for (question, answer) in answers.iter() {
            // 每道题重新查询，前一次点击可能改变页面
            let items = match document.query_all(ControlRole::ListItem).await {
                Ok(items) => items,
                Err(e) => {
                    warn!("⚠️ 查询列表项失败，跳过: {}: {}", question, e);
                    continue;
                }
            };

            for item in &items {
                let header = match item.visible_text().await {
                    Ok(text) => normalize(&numbered_or_first_line(&text)),
                    Err(e) => {
                        warn!("⚠️ 读取列表项失败: {}", e);
                        continue;
                    }
                };
                if TextRelation::between(&header, question).is_none() {
                    continue;
                }

                match self.select_in_item(item, answer).await {
                    Ok(true) => filled.record(question),
                    Ok(false) => debug!("⚠️ 没有匹配的单选: {} → {}", question, answer),
                    Err(e) => warn!("⚠️ 单选点击失败: {}: {}", question, e),
                }
            }
        }
        Ok(())
    }
}

//! 页面文档 - 基础设施层
//!
//! 持有唯一的 Page 资源，用 chromiumoxide 实现文档能力接口

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::element::Element;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Browser, Page};
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::infrastructure::document::{ControlRole, FormDocument, FormElement};

const IS_VISIBLE_JS: &str = r#"function() {
    const style = window.getComputedStyle(this);
    const rect = this.getBoundingClientRect();
    return style.visibility !== 'hidden' && style.display !== 'none' && rect.width > 0 && rect.height > 0;
}"#;

const IS_ENABLED_JS: &str = r#"function() {
    return !this.disabled && this.getAttribute('aria-disabled') !== 'true';
}"#;

const VALUE_JS: &str = r#"function() { return this.value ?? ''; }"#;

const ENCLOSING_ITEM_JS: &str = r#"function() {
    const item = this.closest('div[role="listitem"]');
    return item ? item.innerText.trim() : '';
}"#;

/// 在超时内等待导航完成，超时与失败分别映射为对应的浏览器错误
async fn bounded_navigation<F, T, E>(url: &str, timeout: Duration, navigation: F) -> Result<()>
where
    F: Future<Output = std::result::Result<T, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    match tokio::time::timeout(timeout, navigation).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(e)) => Err(AppError::navigation_failed(url, e).into()),
        Err(_) => Err(AppError::navigation_timeout(url, timeout.as_secs()).into()),
    }
}

/// 页面文档
///
/// 职责：
/// - 持有 Browser 和 Page
/// - 只暴露文档能力，不认识题目和答案
pub struct PageDocument {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    /// 是否由本程序启动（连接模式下只关闭自己的页面）
    owns_browser: bool,
}

impl PageDocument {
    pub fn new(browser: Browser, page: Page, handler_task: JoinHandle<()>, owns_browser: bool) -> Self {
        Self {
            browser,
            page,
            handler_task,
            owns_browser,
        }
    }
}

#[async_trait]
impl FormDocument for PageDocument {
    type Element = PageElement;

    async fn inject_access_token(&self, token: &str) -> Result<()> {
        let script = format!(
            "window.localStorage.setItem('access_token', {});",
            serde_json::to_string(token)?
        );
        self.page
            .evaluate_on_new_document(AddScriptToEvaluateOnNewDocumentParams::new(script))
            .await
            .map_err(AppError::script_failed)?;
        debug!("已注册访问令牌注入脚本");
        Ok(())
    }

    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()> {
        bounded_navigation(url, timeout, self.page.goto(url)).await
    }

    async fn query_all(&self, role: ControlRole) -> Result<Vec<PageElement>> {
        let elements = self
            .page
            .find_elements(role.selector())
            .await
            .map_err(AppError::script_failed)?;
        Ok(elements.into_iter().map(PageElement::new).collect())
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        let params = ScreenshotParams::builder().full_page(true).build();
        self.page
            .save_screenshot(params, path)
            .await
            .map_err(|e| AppError::screenshot_failed(path.display().to_string(), e))?;
        Ok(())
    }

    async fn close(mut self) -> Result<()> {
        if self.owns_browser {
            if let Err(e) = self.browser.close().await {
                warn!("关闭浏览器失败: {}", e);
            }
            if let Err(e) = self.browser.wait().await {
                warn!("等待浏览器进程退出失败: {}", e);
            }
        } else {
            self.page.close().await.map_err(AppError::script_failed)?;
        }
        self.handler_task.abort();
        Ok(())
    }
}

/// 页面元素
pub struct PageElement {
    element: Element,
}

impl PageElement {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    /// 以元素为 this 调用 JS 函数并反序列化返回值
    async fn call_fn<T: DeserializeOwned + Default>(&self, function_declaration: &str) -> Result<T> {
        let returns = self
            .element
            .call_js_fn(function_declaration, false)
            .await
            .map_err(AppError::script_failed)?;
        match returns.result.value {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(T::default()),
        }
    }
}

#[async_trait]
impl FormElement for PageElement {
    async fn accessible_label(&self) -> Result<Option<String>> {
        let label = self
            .element
            .attribute("aria-label")
            .await
            .map_err(AppError::script_failed)?;
        Ok(label.filter(|l| !l.trim().is_empty()))
    }

    async fn visible_text(&self) -> Result<String> {
        let text = self
            .element
            .inner_text()
            .await
            .map_err(AppError::script_failed)?;
        Ok(text.unwrap_or_default())
    }

    async fn value(&self) -> Result<String> {
        self.call_fn(VALUE_JS).await
    }

    async fn set_value(&self, value: &str) -> Result<()> {
        // 走原生 setter，并派发 input/change 让页面框架感知
        let js = format!(
            r#"function() {{
                const proto = this instanceof HTMLTextAreaElement
                    ? HTMLTextAreaElement.prototype
                    : HTMLInputElement.prototype;
                const setter = Object.getOwnPropertyDescriptor(proto, 'value').set;
                this.focus();
                setter.call(this, {});
                this.dispatchEvent(new Event('input', {{ bubbles: true }}));
                this.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }}"#,
            serde_json::to_string(value)?
        );
        let _: bool = self.call_fn(&js).await?;
        Ok(())
    }

    async fn click(&self) -> Result<()> {
        self.element.click().await.map_err(AppError::script_failed)?;
        Ok(())
    }

    async fn is_visible(&self) -> Result<bool> {
        self.call_fn(IS_VISIBLE_JS).await
    }

    async fn is_enabled(&self) -> Result<bool> {
        self.call_fn(IS_ENABLED_JS).await
    }

    async fn query_all(&self, role: ControlRole) -> Result<Vec<Self>> {
        let elements = self
            .element
            .find_elements(role.selector())
            .await
            .map_err(AppError::script_failed)?;
        Ok(elements.into_iter().map(PageElement::new).collect())
    }

    async fn enclosing_item_text(&self) -> Result<String> {
        self.call_fn(ENCLOSING_ITEM_JS).await
    }
}

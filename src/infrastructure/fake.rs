//! 内存中的假文档，测试用

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::AppError;
use crate::infrastructure::document::{ControlRole, FormDocument, FormElement, SessionLauncher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    ListItem,
    Radio,
    Checkbox,
    Listbox,
    ListboxOption,
    TextInput,
    EmailInput,
    Button,
}

fn role_matches(role: ControlRole, kind: Kind) -> bool {
    match role {
        ControlRole::ListItem => kind == Kind::ListItem,
        ControlRole::Choice => matches!(kind, Kind::Radio | Kind::Checkbox | Kind::ListboxOption),
        ControlRole::Radio => kind == Kind::Radio,
        ControlRole::Checkbox => kind == Kind::Checkbox,
        ControlRole::Listbox => kind == Kind::Listbox,
        ControlRole::ListboxOption => kind == Kind::ListboxOption,
        ControlRole::TextEntry => matches!(kind, Kind::TextInput | Kind::EmailInput),
        ControlRole::EmailInput => kind == Kind::EmailInput,
        ControlRole::Button => kind == Kind::Button,
    }
}

#[derive(Debug)]
struct Node {
    kind: Kind,
    label: Option<String>,
    text: String,
    value: Mutex<String>,
    visible: AtomicBool,
    enabled: AtomicBool,
    children: Vec<FakeElement>,
    enclosing_text: Mutex<String>,
    clicks: AtomicUsize,
    writes: AtomicUsize,
}

/// 假元素，克隆后共享同一节点
#[derive(Debug, Clone)]
pub struct FakeElement(Arc<Node>);

impl FakeElement {
    fn node(kind: Kind, label: Option<&str>, text: &str, children: Vec<FakeElement>) -> Self {
        Self(Arc::new(Node {
            kind,
            label: label.map(str::to_string),
            text: text.to_string(),
            value: Mutex::new(String::new()),
            visible: AtomicBool::new(true),
            enabled: AtomicBool::new(true),
            children,
            enclosing_text: Mutex::new(String::new()),
            clicks: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }))
    }

    /// 列表项：文本为各行拼接，子元素记录所在列表项文本
    pub fn item(lines: &[&str], children: Vec<FakeElement>) -> Self {
        let text = lines.join("\n");
        let item = Self::node(Kind::ListItem, None, &text, children);
        item.mark_enclosing(&text);
        item
    }

    fn mark_enclosing(&self, text: &str) {
        for child in &self.0.children {
            *child.0.enclosing_text.lock().unwrap() = text.to_string();
            child.mark_enclosing(text);
        }
    }

    pub fn radio(label: &str) -> Self {
        Self::node(Kind::Radio, Some(label), label, Vec::new())
    }

    pub fn checkbox(label: &str) -> Self {
        Self::node(Kind::Checkbox, Some(label), label, Vec::new())
    }

    /// 只有可见文本、没有 aria-label 的下拉选项
    pub fn option(text: &str) -> Self {
        Self::node(Kind::ListboxOption, None, text, Vec::new())
    }

    pub fn listbox(options: Vec<FakeElement>) -> Self {
        Self::node(Kind::Listbox, None, "", options)
    }

    pub fn text_input(label: Option<&str>) -> Self {
        Self::node(Kind::TextInput, label, "", Vec::new())
    }

    pub fn email_input() -> Self {
        Self::node(Kind::EmailInput, Some("Email"), "", Vec::new())
    }

    pub fn button(text: &str) -> Self {
        Self::node(Kind::Button, None, text, Vec::new())
    }

    /// 带 aria-label 的按钮，可见文本可以与标签不同
    pub fn labelled_button(label: &str, text: &str) -> Self {
        Self::node(Kind::Button, Some(label), text, Vec::new())
    }

    pub fn hidden(self) -> Self {
        self.0.visible.store(false, Ordering::SeqCst);
        self
    }

    pub fn disabled(self) -> Self {
        self.0.enabled.store(false, Ordering::SeqCst);
        self
    }

    pub fn with_value(self, value: &str) -> Self {
        *self.0.value.lock().unwrap() = value.to_string();
        self
    }

    pub fn clicks(&self) -> usize {
        self.0.clicks.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.0.writes.load(Ordering::SeqCst)
    }

    pub fn current_value(&self) -> String {
        self.0.value.lock().unwrap().clone()
    }

    fn collect(&self, role: ControlRole, out: &mut Vec<FakeElement>) {
        for child in &self.0.children {
            if role_matches(role, child.0.kind) {
                out.push(child.clone());
            }
            child.collect(role, out);
        }
    }
}

#[async_trait]
impl FormElement for FakeElement {
    async fn accessible_label(&self) -> Result<Option<String>> {
        Ok(self.0.label.clone().filter(|l| !l.trim().is_empty()))
    }

    async fn visible_text(&self) -> Result<String> {
        Ok(self.0.text.clone())
    }

    async fn value(&self) -> Result<String> {
        Ok(self.current_value())
    }

    async fn set_value(&self, value: &str) -> Result<()> {
        self.0.writes.fetch_add(1, Ordering::SeqCst);
        *self.0.value.lock().unwrap() = value.to_string();
        Ok(())
    }

    async fn click(&self) -> Result<()> {
        self.0.clicks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn is_visible(&self) -> Result<bool> {
        Ok(self.0.visible.load(Ordering::SeqCst))
    }

    async fn is_enabled(&self) -> Result<bool> {
        Ok(self.0.enabled.load(Ordering::SeqCst))
    }

    async fn query_all(&self, role: ControlRole) -> Result<Vec<Self>> {
        let mut out = Vec::new();
        self.collect(role, &mut out);
        Ok(out)
    }

    async fn enclosing_item_text(&self) -> Result<String> {
        Ok(self.0.enclosing_text.lock().unwrap().clone())
    }
}

/// 假文档：顶层元素 + 调用记录
#[derive(Debug, Default)]
pub struct FakeDocument {
    roots: Vec<FakeElement>,
    pub navigation_hangs: bool,
    /// 前 N 次列表项查询返回错误
    pub failing_item_queries: AtomicUsize,
    pub navigations: Mutex<Vec<String>>,
    pub tokens: Mutex<Vec<String>>,
    pub screenshots: Mutex<Vec<PathBuf>>,
    pub closed: Arc<AtomicBool>,
}

impl FakeDocument {
    pub fn new(roots: Vec<FakeElement>) -> Self {
        Self {
            roots,
            ..Self::default()
        }
    }

    /// 导航永远超时
    pub fn hanging(mut self) -> Self {
        self.navigation_hangs = true;
        self
    }

    /// 前 `count` 次列表项查询失败
    pub fn failing_item_queries(self, count: usize) -> Self {
        self.failing_item_queries.store(count, Ordering::SeqCst);
        self
    }
}

#[async_trait]
impl FormDocument for FakeDocument {
    type Element = FakeElement;

    async fn inject_access_token(&self, token: &str) -> Result<()> {
        self.tokens.lock().unwrap().push(token.to_string());
        Ok(())
    }

    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()> {
        self.navigations.lock().unwrap().push(url.to_string());
        if self.navigation_hangs {
            return Err(AppError::navigation_timeout(url, timeout.as_secs()).into());
        }
        Ok(())
    }

    async fn query_all(&self, role: ControlRole) -> Result<Vec<FakeElement>> {
        if role == ControlRole::ListItem
            && self
                .failing_item_queries
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
        {
            return Err(AppError::script_failed("detached document").into());
        }
        let mut out = Vec::new();
        for root in &self.roots {
            if role_matches(role, root.0.kind) {
                out.push(root.clone());
            }
            root.collect(role, &mut out);
        }
        Ok(out)
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        self.screenshots.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    async fn close(self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// 每次启动交出预先准备好的假文档
pub struct FakeLauncher {
    document: Mutex<Option<FakeDocument>>,
    pub closed: Arc<AtomicBool>,
}

impl FakeLauncher {
    pub fn new(document: FakeDocument) -> Self {
        let closed = document.closed.clone();
        Self {
            document: Mutex::new(Some(document)),
            closed,
        }
    }

    pub fn failing() -> Self {
        Self {
            document: Mutex::new(None),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait]
impl SessionLauncher for FakeLauncher {
    type Document = FakeDocument;

    async fn launch(&self) -> Result<FakeDocument> {
        self.document
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| AppError::browser_launch_failed("no browser available").into())
    }
}

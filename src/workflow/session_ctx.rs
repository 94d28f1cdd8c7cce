//! 会话上下文
//!
//! 封装"我正在处理哪个表单、走到了哪一步"这一信息

use std::fmt::Display;

use tracing::{debug, info};

use crate::workflow::session_state::SessionState;

/// 会话上下文
#[derive(Debug, Clone)]
pub struct SessionCtx {
    /// 目标表单地址
    pub form_url: String,

    /// 是否为需要登录的受限表单
    pub restricted: bool,

    state: SessionState,
}

impl SessionCtx {
    pub fn new(form_url: impl Into<String>) -> Self {
        Self {
            form_url: form_url.into(),
            restricted: false,
            state: SessionState::Launch,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// 进入下一个阶段；状态只前进不后退
    pub fn advance(&mut self, next: SessionState) {
        if next < self.state {
            debug!("{} 忽略回退: {} → {}", self, self.state, next);
            return;
        }
        self.state = next;
        info!("{} ▶ {}", self, next);
    }
}

impl Display for SessionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.restricted { "受限" } else { "公开" };
        write!(f, "[表单#{} {}]", self.form_url, kind)
    }
}

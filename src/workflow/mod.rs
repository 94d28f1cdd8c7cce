pub mod form_flow;
pub mod session_ctx;
pub mod session_state;

pub use form_flow::{FormFlow, SessionReport, SubmitOutcome};
pub use session_ctx::SessionCtx;
pub use session_state::SessionState;

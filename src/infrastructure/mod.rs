pub mod document;
pub mod page_document;

#[cfg(test)]
pub(crate) mod fake;

pub use document::{text_lines, ControlRole, FormDocument, FormElement, SessionLauncher};
pub use page_document::{PageDocument, PageElement};

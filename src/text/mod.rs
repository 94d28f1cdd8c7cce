//! 文本处理：规范化、个人信息判断、模糊关系判断
//!
//! 所有比较都基于规范化后的 key，不直接比较原始文本

pub mod normalize;
pub mod personal;
pub mod relation;

pub use normalize::normalize;
pub use personal::is_personal;
pub use relation::{mutual_substring, TextRelation};

// src/prompt/mod.rs
// Prompt templates and role labels

use serde::{Deserialize, Serialize};

pub mod builder;

pub use builder::{build_prompt, render_analysis_prompt};

/// Placeholder the analysis template substitutes the panic log into
pub const PANIC_LOG_PLACEHOLDER: &str = "{panic_log}";

/// Single-shot instruction for `/analyze`
pub const DEFAULT_ANALYSIS_TEMPLATE: &str = "Bạn là kỹ thuật viên chuyên sửa iPhone.
Đây là panic log cần phân tích:
{panic_log}

Hãy xác định khả năng phần cứng hoặc phần mềm bị lỗi và gợi ý kiểm tra hoặc hướng khắc phục cụ thể.";

/// System instruction placed at the top of every chat prompt
pub const DEFAULT_CHAT_INSTRUCTION: &str = "Bạn là kỹ thuật viên chuyên sửa iPhone, đang trò chuyện với khách hàng.
Dựa vào lịch sử trò chuyện bên dưới, trả lời ngắn gọn và gợi ý các bước kiểm tra hoặc hướng khắc phục cụ thể.";

/// Labels written in front of each conversation line, plus the header that
/// separates the instruction from the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleLabels {
    pub user: String,
    pub assistant: String,
    pub separator: String,
}

impl Default for RoleLabels {
    fn default() -> Self {
        Self {
            user: "Người dùng".to_string(),
            assistant: "Trợ lý".to_string(),
            separator: "Lịch sử trò chuyện:".to_string(),
        }
    }
}

impl RoleLabels {
    pub fn new(
        user: impl Into<String>,
        assistant: impl Into<String>,
        separator: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
            separator: separator.into(),
        }
    }

    /// English labels
    pub fn english() -> Self {
        Self::new("User", "Assistant", "Conversation:")
    }
}

//! Input validation helpers
//!
//! Text length limits mirror the order service columns:
//! - customer names are stored in a 100-char column
//! - instructions are free text, capped at 500 chars for the kitchen ticket

use crate::error::{AppError, AppResult};

// ── Text length limits ──────────────────────────────────────────────

/// Customer names, menu item names
pub const MAX_NAME_LEN: usize = 100;

/// Special instructions (order level and item level)
pub const MAX_NOTE_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::required(field));
    }
    check_len(value, field, max_len)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(value: &Option<String>, field: &str, max_len: usize) -> AppResult<()> {
    if let Some(v) = value {
        check_len(v, field, max_len)?;
    }
    Ok(())
}

fn check_len(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Empty or whitespace-only input means "not given"
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

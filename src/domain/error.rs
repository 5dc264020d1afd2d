//! Domain error types for Tabsmith.
//!
//! These are rejections of a single editing action. None of them leave the
//! collection in a changed state.

use thiserror::Error;

/// Errors raised by tab collection operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TabError {
    #[error("You can make up to {max} tabs only.")]
    TooManyTabs { max: usize },

    #[error("Keep at least one tab.")]
    LastTab,

    #[error("Tab index {index} is out of range for {len} tabs")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No tab ids are left to assign.")]
    IdsExhausted,
}

impl TabError {
    /// True for the capacity rejections that are shown to the user as a notice.
    pub fn is_capacity(&self) -> bool {
        matches!(
            self,
            TabError::TooManyTabs { .. } | TabError::LastTab | TabError::IdsExhausted
        )
    }
}

//! Domain types for Tabsmith
//! Defines the tab collection and the rules every edit must respect.

pub mod error;
pub mod tab;

pub use error::*;
pub use tab::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_messages() {
        assert_eq!(
            TabError::TooManyTabs { max: MAX_TABS }.to_string(),
            "You can make up to 15 tabs only."
        );
        assert_eq!(TabError::LastTab.to_string(), "Keep at least one tab.");
        assert!(TabError::LastTab.is_capacity());
        assert!(TabError::IdsExhausted.is_capacity());
        assert!(!TabError::IndexOutOfRange { index: 3, len: 1 }.is_capacity());
    }
}

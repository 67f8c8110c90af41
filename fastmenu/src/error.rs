use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    #[error("menu size must be a multiple of 9 between 9 and 54, got {0}")]
    InvalidSize(usize),

    #[error("slot {slot} is outside of a menu with {size} slots")]
    InvalidSlot { slot: usize, size: usize },

    #[error("{content} content items were given with {handlers} click handlers")]
    ContentMismatch { content: usize, handlers: usize },

    #[error("content index {index} is out of bounds ({len} items)")]
    InvalidContentIndex { index: usize, len: usize },

    #[error("a paginated menu needs at least one content slot")]
    NoContentSlots,

    #[error("invalid click: button {button} for {action}")]
    InvalidClick { action: &'static str, button: i8 },

    #[error("the main thread dropped the task before running it")]
    MainThreadClosed,

    #[error("{material} has no {expected} meta")]
    MetaMismatch {
        material: String,
        expected: &'static str,
    },
}

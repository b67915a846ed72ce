// src/models/mod.rs
pub mod frame;
pub mod token;

// Re-export commonly used types so other modules can use `crate::models::X`
pub use frame::{FrameActionPayload, FrameButton, FrameScreen, TransactionCall};
pub use token::{
    AddressBalance, BurnTransaction, FanToken, RewardSelection, ShareCard, TokenQuery,
};

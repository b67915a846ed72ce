pub mod card_renderer;
pub mod contracts;
pub mod frame_flow;
pub mod onchain;
pub mod reward;
pub mod transaction_builder;

#[cfg(test)]
pub mod test_support;

pub use frame_flow::FrameFlow;
pub use reward::RewardCalculator;
pub use transaction_builder::TransactionBuilder;

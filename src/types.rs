pub use alloy::primitives::{Address, ChainId, U256, address};
pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;

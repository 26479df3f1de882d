//! Polymarket CLOB wire types.

pub mod types;

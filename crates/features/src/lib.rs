//! Profile computation for the volume-profile workspace.
//!
//! This crate handles:
//! - Price-volume histogram construction
//! - Value Area computation (POC, VAH, VAL)
//! - Buy/sell split profiles with imbalance flagging
//! - Swing-based support/resistance level detection

pub mod engine;
pub mod histogram;
pub mod levels;
pub mod order_flow;
pub mod value_area;

pub use engine::ProfileEngine;
pub use histogram::PriceHistogram;
pub use levels::LevelDetector;
pub use order_flow::OrderFlowProfile;
pub use value_area::ValueAreaComputer;

//! Persistence of order state.

pub mod order;

pub use order::OrderStateMachine;

//! Conversation turns: the orchestrator and its turn state machine.

pub mod orchestrator;
pub mod turn;

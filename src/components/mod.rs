//! UI components.

pub mod fund_graph;

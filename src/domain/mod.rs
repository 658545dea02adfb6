// Domain layer - Diagnostic data and session invariants
pub mod chart;
pub mod history;
pub mod prediction;
pub mod session;

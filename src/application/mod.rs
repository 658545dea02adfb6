// Application layer - Use cases and the collaborators they depend on
pub mod analysis_runner;
pub mod connectivity_probe;
pub mod diagnostic_backend;
pub mod report_exporter;
pub mod report_sink;
pub mod session_store;

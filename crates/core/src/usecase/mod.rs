pub mod orchestrator;
pub mod rewrite_service;
pub mod session;

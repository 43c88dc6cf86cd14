pub mod metrics;
pub mod rewriter;
pub mod storage;

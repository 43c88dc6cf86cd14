pub mod account;
pub mod error;
pub mod rewrite;
pub mod settings;
pub mod style;

#[cfg(test)]
mod serde_tests;

pub mod anonymize;
pub mod confidence;
pub mod dedup;
pub mod engine;
pub mod handlers;
pub mod pool;
pub mod ranking;
pub mod scoring;
pub mod settings;
pub mod skills;
pub mod taxonomy;

#[cfg(test)]
pub mod fixtures;

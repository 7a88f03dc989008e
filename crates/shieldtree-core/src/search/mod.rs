pub mod config;
pub mod domain;
pub mod error;
pub mod knowledge;
pub mod planner;
pub mod rollout;
pub mod shield;
pub mod ucb;

#[cfg(test)]
mod tests;

mod arena;
pub mod belief;
pub mod edges;
pub mod error;
pub mod history;
pub mod ids;
pub mod node;
pub mod outcomes;
pub mod search_tree;
pub mod snapshot;
pub mod stats;

#[cfg(test)]
mod tests;

//! Integration tests for the tree-state engine

mod eager_scenarios;
mod lazy_scenarios;
mod properties;

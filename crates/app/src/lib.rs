//! Parts store client, mutation coordinator and command-line plumbing.

pub mod config;
pub mod context;
pub mod coordinator;
pub mod observability;
pub mod store;

#[cfg(test)]
mod test;

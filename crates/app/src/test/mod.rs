//! Test doubles and shared setup for coordinator tests.


pub(crate) use context::TestContext;
pub(crate) use store::InMemoryStore;

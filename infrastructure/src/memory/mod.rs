//! In-process document store
//!
//! Stands in for the shared remote store: create-only collections with key
//! uniqueness enforced under one lock, push subscriptions for matches, and
//! fault injection for exercising the retry and journaling paths.

mod document_store;

pub use document_store::{MemoryDocumentStore, Operation};

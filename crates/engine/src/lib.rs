// crates/engine/src/lib.rs
//! Asynchronous search-job engine for the tubescout console.
//!
//! The console hands a "find matching items across the configured backend
//! servers" request to [`SearchEngine::enqueue`], gets back a job id, and
//! polls [`SearchEngine::poll`] until the job reaches a terminal status.
//! A single background worker drains the bounded hand-off queue and fans
//! the search out to every configured server, one at a time; results land
//! in a shared, guarded store.
//!
//! Shutdown is best-effort and lossy: cancelling the engine lets the worker
//! finish the job it is on, but jobs already accepted into the hand-off
//! queue and not yet dequeued are dropped and never appear in the store.

pub mod service;
pub mod store;
mod worker;

pub use service::SearchEngine;
pub use store::ResultStore;

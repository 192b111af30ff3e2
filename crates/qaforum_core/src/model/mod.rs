//! Typed forum records.
//!
//! # Responsibility
//! - Define the five forum row shapes with named, typed fields.
//! - Track the transient/persisted lifecycle through `id: Option<_>`.
//!
//! # Invariants
//! - `id == None` means the record was never saved; `Some` means it was
//!   materialized from, or written to, the store.
//! - Foreign keys are plain ids; relationships are resolved through
//!   repositories, never through in-memory references.

pub mod association;
pub mod question;
pub mod reply;
pub mod user;

/// Store-assigned user row id.
pub type UserId = i64;
/// Store-assigned question row id.
pub type QuestionId = i64;
/// Store-assigned reply row id.
pub type ReplyId = i64;

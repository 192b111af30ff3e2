//! Repository layer: typed lookups, traversal and persistence.
//!
//! # Responsibility
//! - Define per-entity data access contracts.
//! - Keep SQL inside the persistence boundary; callers see typed records.
//!
//! # Invariants
//! - Every repository checks the forum tables before first use (`try_new`).
//! - Single-row finders return `Ok(None)` for a missing row; multi-row
//!   finders return an empty list. Neither is an error.

pub mod entity;
pub mod follow_repo;
pub mod like_repo;
pub mod question_repo;
pub mod reply_repo;
pub mod user_repo;

//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `qaforum_core` linkage.
//! - Open an in-memory store so schema bootstrap runs end to end.

use qaforum_core::db::schema::TABLES;
use qaforum_core::DbHandle;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("qaforum_core ping={}", qaforum_core::ping());
    println!("qaforum_core version={}", qaforum_core::core_version());

    let handle = DbHandle::in_memory();
    match handle.get_connection() {
        Ok(_) => {
            println!("qaforum_core schema=ok tables={}", TABLES.join(","));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("qaforum_core schema=error error={err}");
            ExitCode::FAILURE
        }
    }
}

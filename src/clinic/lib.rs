//! # Clinic Architecture
//!
//! A record keeper for a small clinic: patients with their medical history,
//! appointments, and prescriptions with printable pages. Records are kept in plain
//! text files so they survive between sessions and stay readable without the tool.
//!
//! The crate is a library with a thin interactive client on top.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Reads command lines, prints results, owns stdout/stderr  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Opens the store, parses a line, dispatches the command   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One function per verb, returns CmdResult                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Record Store (system.rs) over Storage (store/)             │
//! │  - In-memory collections, id counters, write-through        │
//! │  - StorageBackend trait: FsBackend, MemBackend              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Input grammar
//!
//! Commands are a verb followed by prefixed fields (`n/John Doe ic/S1234567A ...`).
//! Fields may come in any order; [`grammar`] holds the scanning rules and [`parser`]
//! turns a line into a typed [`parser::Command`].
//!
//! ## No I/O in the core
//!
//! From `api.rs` inward nothing writes to stdout or stderr or exits the process. Files
//! are touched only through [`store::StorageBackend`], so every layer can be tested
//! against [`store::memory::MemBackend`].

pub mod api;
pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod grammar;
pub mod model;
pub mod parser;
pub mod store;
pub mod system;

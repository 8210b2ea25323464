//! rfgate library: gated capture and replay workflow for RF toolkits.
//!
//! This crate is the safety-control layer between a user interface and the
//! radios. It contains the workflow state machine, the transmit policy and
//! audit engine, the deterministic event log, and the per-band signal
//! handling, with no platform dependencies, testable on any host with
//! `cargo test`. Platform binaries are thin consumers that provide radio
//! back ends, a clock and an output sink.
//!
//! The library is organized in three layers:
//! - **Core**: `fsm`, `policy`, `eventlog`, `signal`, `ring`, `clock`,
//!   `config`, `defaults`, `error`, `text`. `no_std` + `alloc`.
//! - **Bands**: `subghz` (433 MHz pulse trains), `ism` (2.4 GHz frames),
//!   `analysis`, and the `backend` trait the radios implement.
//! - **Host**: `workflow` ties the core together; `protocol` and `comm`
//!   speak NDJSON to a host controller.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod analysis;
pub mod backend;
pub mod clock;
pub mod comm;
pub mod config;
pub mod defaults;
pub mod error;
pub mod eventlog;
pub mod fsm;
pub mod ism;
pub mod policy;
pub mod protocol;
pub mod ring;
pub mod signal;
pub mod subghz;
pub mod text;
pub mod workflow;

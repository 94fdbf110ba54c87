#![forbid(unsafe_code)]

//! PageWard Runtime
//!
//! This crate ties the core types into a working warning page: it wires
//! named controls to handlers at setup time and dispatches page events to
//! outbound commands.
//!
//! # Key Components
//!
//! - [`InterstitialController`] - setup-time wiring and event dispatch
//! - [`Wiring`] - which handlers are attached, plus presentation flags
//! - [`DetailsPanel`] - details disclosure state with one-shot telemetry
//! - [`CommandSink`] - one-way outbound channel to the host process
//!
//! # Role in PageWard
//! `pageward-runtime` is the orchestrator. It consumes configuration and
//! events from `pageward-core`, applies the dispatch rules, and emits
//! commands into a [`CommandSink`]. Everything is single-threaded and
//! synchronous: each event runs to completion and emits zero or one command,
//! in event order.

pub mod controller;
pub mod details;
pub mod sink;

pub use controller::{InterstitialController, Wiring};
pub use details::{DetailsPanel, DetailsToggle};
pub use sink::{CommandSink, RecordingSink};

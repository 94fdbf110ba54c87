#![forbid(unsafe_code)]

//! Core: page configuration, canonical events, and the bypass detector.
//!
//! # Role in PageWard
//! `pageward-core` is the input layer. It owns the canonical event types the
//! runtime consumes, the named-control vocabulary of a warning page, the
//! outbound command vocabulary, and the secret-sequence detector.
//!
//! # Primary responsibilities
//! - **PageConfig**: immutable warning-page configuration snapshot.
//! - **PageEvent**: canonical input events (control activation, key presses).
//! - **Command**: the fixed outbound command vocabulary.
//! - **BypassDetector**: linear prefix matcher for the operator bypass
//!   sequence.
//!
//! # How it fits in the system
//! The runtime (`pageward-runtime`) consumes these types and drives the
//! interstitial controller. Presentation (DOM nodes, CSS classes, localized
//! strings) is a separate collaborator and never appears here.

pub mod bypass;
pub mod command;
pub mod config;
pub mod control;
pub mod event;

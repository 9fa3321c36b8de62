//! Application layer: the recording pipeline.
//!
//! `PaymentRecorder` is the entry point for provider callbacks. It drives the
//! receiver, ledger writer, cart clearer and notifier in order, isolating the
//! failure of each step from the ones after it.

pub mod cart;
pub mod ledger;
pub mod notifier;
pub mod receiver;
pub mod recorder;

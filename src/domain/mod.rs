//! Domain layer: payment outcomes, ledger records, and the ports the
//! recorder needs from the outside world.

pub mod clock;
pub mod event;
pub mod outcome;
pub mod path;
pub mod ports;
pub mod record;

//! Relay wiring between plugin parameters and a web UI.
//!
//! ```text
//! RelaySet ──▶ SurfaceOptions::with_relays ──▶ build(factory, parent)
//!                                                   │
//!                                             UnboundEditor
//!                                                   │ bind(parameters, sink)
//!                                                   ▼
//!                                                Editor ◀──▶ page
//! ```
//!
//! Each step consumes the previous one, so relays are always registered
//! before the surface exists and bound only after it does.

mod attachment;
mod editor;
mod error;
pub mod ipc;
mod options;
mod relay;
mod telemetry_pump;

pub use editor::{Editor, UnboundEditor};
pub use error::RelayError;
pub use ipc::WebMessage;
pub use options::SurfaceOptions;
pub use relay::{Relay, RelayKind, RelaySet, RelayState};
pub use telemetry_pump::{PumpOutcome, TelemetryPump};

//! Application assembly: settings, tracing and port wiring.

mod settings;
mod state_builders;
pub mod telemetry;

pub use settings::MarketplaceSettings;
pub use state_builders::{BuildError, MarketplacePorts, build_ports, ports_for_store};
pub use telemetry::{TelemetryError, init_tracing};

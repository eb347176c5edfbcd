// Domain layer: countdown models and ports (interfaces). No runtime dependencies beyond chrono/serde.

pub mod model;
pub mod ports;

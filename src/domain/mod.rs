// Domain layer: repository records and the transport port. Adapters live in crate::adapters.

pub mod model;
pub mod ports;

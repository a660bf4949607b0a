// Domain layer: wire models and the ports controllers depend on.

pub mod model;
pub mod ports;

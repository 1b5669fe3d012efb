// Domain layer: plain data models and ports (interfaces) the core and adapters meet at.

pub mod model;
pub mod ports;

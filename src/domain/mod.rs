// Domain layer: core models and ports (interfaces). No file-system or CLI dependencies.

pub mod model;
pub mod ports;

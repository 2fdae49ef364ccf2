// Domain layer: spreadsheet models and ports (interfaces).

pub mod model;
pub mod ports;

// Domain layer: region models, ordering rules and ports (interfaces).

pub mod model;
pub mod ordering;
pub mod ports;

// Domain layer: fare model, batch records and ports (interfaces).

pub mod batch;
pub mod model;
pub mod ports;

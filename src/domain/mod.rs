// Domain layer: records, query/result values and ports. No I/O here.

pub mod model;
pub mod ports;

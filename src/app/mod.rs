// Application layer: turns engine results into user-facing output.

pub mod report;

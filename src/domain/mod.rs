// Domain layer: the thought shape and the ports used to feed documents in.

pub mod model;
pub mod ports;

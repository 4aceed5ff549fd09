pub mod optim;
pub mod stats;

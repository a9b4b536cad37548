pub mod cost;
pub mod quote;
pub mod service;
pub mod workload;

pub mod kubectl;
pub mod monitor;

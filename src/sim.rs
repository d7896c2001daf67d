pub mod aggregate;
pub mod strategy;

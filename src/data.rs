pub mod domain;
pub mod filter;
pub mod frame;

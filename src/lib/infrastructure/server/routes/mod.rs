pub mod invocations;
pub mod ping;

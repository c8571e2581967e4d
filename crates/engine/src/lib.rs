pub mod cycle;
pub mod dispatch;
pub mod pacer;
pub mod retry;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

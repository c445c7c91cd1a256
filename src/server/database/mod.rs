pub(crate) mod connection;
#[cfg(test)]
pub(crate) mod mock;
pub(crate) mod pool;

pub(crate) mod duplicate;
pub(crate) mod log;

pub(crate) mod record;
pub(crate) mod resolver;
pub(crate) mod selector;

pub(crate) mod blend;
pub(crate) mod compose;

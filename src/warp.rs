pub(crate) mod blend;
pub(crate) mod field;
pub(crate) mod morph;
pub(crate) mod sample;

pub(crate) mod config;
pub(crate) mod inputs;
pub(crate) mod line_file;
pub(crate) mod model;

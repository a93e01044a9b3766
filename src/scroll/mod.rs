pub(crate) mod context;
pub(crate) mod geometry;
pub(crate) mod host;
pub(crate) mod scheduler;

pub(crate) mod params;
pub(crate) mod phase;
pub(crate) mod progress;
pub(crate) mod render;
pub(crate) mod reveal;
pub(crate) mod selector;
pub(crate) mod wipe;

pub(crate) mod cache;
pub(crate) mod plugin;
pub(crate) mod scheduler;
pub(crate) mod surface;
pub(crate) mod svg_export;

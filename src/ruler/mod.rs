pub(crate) mod guideline;
pub(crate) mod plugin;
pub(crate) mod snap;
pub(crate) mod ticks;
pub(crate) mod viewport;

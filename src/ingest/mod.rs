pub(crate) mod classify;
pub(crate) mod clean;
pub(crate) mod clip;
pub(crate) mod flatten;
pub(crate) mod fonts;
pub(crate) mod import;
pub(crate) mod pipeline;
pub(crate) mod xml;

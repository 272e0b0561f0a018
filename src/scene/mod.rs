pub(crate) mod arena;
pub(crate) mod document;
pub(crate) mod history;
pub(crate) mod object;
pub(crate) mod store;

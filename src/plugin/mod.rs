pub(crate) mod bus;
pub(crate) mod event;
pub(crate) mod kernel;
pub(crate) mod options;

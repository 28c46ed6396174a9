pub(crate) mod builtin;
pub(crate) mod cpu;
pub(crate) mod font;
pub(crate) mod layout;
pub(crate) mod writer;

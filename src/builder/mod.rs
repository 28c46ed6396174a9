pub(crate) mod captcha;
pub(crate) mod opts;
pub(crate) mod state;

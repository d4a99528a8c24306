//! CLI command implementations.

pub(crate) mod decode;
pub(crate) mod render;
pub(crate) mod serve;
pub(crate) mod share;

pub(crate) use decode::DecodeArgs;
pub(crate) use render::RenderArgs;
pub(crate) use serve::ServeArgs;
pub(crate) use share::ShareArgs;

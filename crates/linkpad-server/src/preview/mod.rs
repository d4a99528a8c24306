//! Live preview plumbing: the render loop, frame fan-out, and the
//! WebSocket that pushes frames to the browser.

mod driver;
mod frames;
mod websocket;

pub(crate) use driver::PreviewDriver;
pub(crate) use frames::{BroadcastSurface, LatestFrame, PreviewEvent};
pub(crate) use websocket::ws_handler;

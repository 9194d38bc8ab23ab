// Library root: draft engine, configuration, and the shared session used by
// the terminal front-ends and the viewer feed.

pub mod catalog;
pub mod config;
pub mod draft;
pub mod photo;
pub mod protocol;
pub mod valuation;
pub mod ws_server;

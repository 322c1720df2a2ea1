//! Client side of the task service: an HTTP client for the five task
//! endpoints and an explicit application state that mirrors the server's
//! list, in the manner of a single-page form/list UI.

pub mod api;
pub mod app;
pub mod render;

pub use api::{ClientError, TaskApi, TaskClient};
pub use app::{App, Operation};
pub use render::{render, render_task};

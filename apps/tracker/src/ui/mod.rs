//! UI layer: HTML and terminal renderings of the controller state.

pub mod console;
pub mod html;

pub mod commands;
pub mod render;
pub mod session;

pub use commands::{execute, Command};
pub use session::Session;

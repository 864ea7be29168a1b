/// Session management module - Gateway

mod state;

pub use state::Session;

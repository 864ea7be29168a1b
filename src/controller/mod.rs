// Gateway module for the view controller - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod events;
mod message;
mod validation;
mod view;
mod view_controller;

#[cfg(test)]
mod tests;

// Public re-exports - the ONLY way to access controller functionality
pub use events::ControllerEvent;
pub use message::{MessageSlot, Severity, StatusMessage};
pub use validation::{validate_login, validate_new_account};
pub use view::{AuthMode, Panel, ViewState};
pub use view_controller::{Controller, ControllerSettings};

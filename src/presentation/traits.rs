use crate::app::{ResultPanel, UploadPreview};
use crate::controller::{StatusMessage, ViewState};
use crate::session::Session;

/// Render hooks implemented by a presentation layer.
///
/// The controller calls these after every state change; it never decides
/// layout. Implementations should treat each call as a full replacement of
/// the corresponding region.
pub trait Presenter {
    /// Show exactly the panel for `view`, hiding the others
    fn render_view(&mut self, view: ViewState, session: &Session);

    /// Replace the message area; `None` hides it
    fn render_message(&mut self, message: Option<&StatusMessage>);

    /// Replace the result panel of the analysis page
    fn render_result(&mut self, panel: &ResultPanel);

    /// Show the staged file preview and whether a submission is pending
    fn render_upload(&mut self, preview: Option<&UploadPreview>, busy: bool);
}

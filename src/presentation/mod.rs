// Gateway module for presentation collaborators - follows the Train Station Pattern
// All external access must go through this gateway

mod files;
mod traits;

pub use files::{guess_mime, to_data_url, DiskFileSource, FileSource, ImageFile};
pub use traits::Presenter;

pub mod chat;
pub mod comparator;
pub mod designs;
pub mod shared;
pub mod style_gallery;
pub mod uploader;
pub mod workspace;

pub use designs::DesignsGallery;
pub use uploader::Uploader;
pub use workspace::Workspace;

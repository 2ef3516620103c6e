mod resource;

pub use resource::{GalleryItem, Resource, ResourceFields, ResourceStatus};

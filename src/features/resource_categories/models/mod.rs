mod resource_category;

pub use resource_category::{NewResourceCategory, ResourceCategory, ResourceCategoryChanges};

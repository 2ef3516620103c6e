pub mod faqs;
pub mod inquiries;
pub mod resource_categories;
pub mod resources;

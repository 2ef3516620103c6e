mod faq_handler;

pub use faq_handler::*;

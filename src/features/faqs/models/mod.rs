mod faq;

pub use faq::{Faq, FaqCategory};

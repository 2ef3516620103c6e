mod inquiry_handler;

pub use inquiry_handler::*;

pub mod extractor;
pub mod session;
pub mod test_utils;

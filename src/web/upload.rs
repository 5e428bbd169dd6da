pub mod chapter;
pub mod local_storage;
pub mod pdf_handler;
pub mod storage;

pub mod barcode;
pub mod command;
pub mod common;
pub mod fileformat;
pub mod runtime;

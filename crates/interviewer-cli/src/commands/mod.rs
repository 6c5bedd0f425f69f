pub mod init;
pub mod interview;
pub mod questions;

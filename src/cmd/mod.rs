pub mod grid;
pub mod init;
pub mod parse;
pub mod root;
pub mod week;

pub mod completion;
pub mod create;
pub mod debug;
pub mod init;
pub mod tree;

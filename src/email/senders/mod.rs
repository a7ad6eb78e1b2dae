pub mod mock;
pub mod smtp;

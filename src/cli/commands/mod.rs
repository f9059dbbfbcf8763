pub mod forum;
pub mod media;
pub mod profile;
pub mod server;
pub mod session;

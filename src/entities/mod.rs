pub mod event;
pub mod photo;
pub mod user;

pub mod booking;
pub mod photo;
pub mod user;

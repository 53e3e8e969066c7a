pub mod emotion;
pub mod user;

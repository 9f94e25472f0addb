//! Route handlers organized by resource

pub mod account;
pub mod health;
pub mod home;
pub mod proverbs;

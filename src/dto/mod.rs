pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod favorites;
pub mod notifications;
pub mod orders;
pub mod payments;
pub mod profile;
pub mod support;

//! Route handlers: HTML pages and the JSON API.

pub mod about;
pub mod admin;
pub mod api;
pub mod explore;
pub mod health;
pub mod pages;
pub mod upload;

pub mod app;
pub mod csrf;
pub mod env;
pub mod error;
pub mod redis;
pub mod upload;
pub mod web;

//! Route modules for Drop Server

pub mod files;
pub mod health;
pub mod upload;

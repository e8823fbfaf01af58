//! View models and askama templates for both HTTP surfaces.

pub mod admin;
pub mod views;

//! Application services layer.

pub mod admin;
pub mod contact_form;
pub mod error;
pub mod news;
pub mod pagination;
pub mod repos;

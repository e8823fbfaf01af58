//! Application services for the administrative surface.

pub mod audit;
pub mod contact_export;
pub mod contacts;

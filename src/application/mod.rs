//! Application services: filtered listings, cached reads and writes with
//! module-scoped cache invalidation.

pub mod blogs;
pub mod careers;
pub mod contacts;
pub mod envelope;
pub mod error;
pub mod filters;
pub mod franchise;
pub mod pagination;
pub mod payments;
pub mod repos;
pub mod resource;
pub mod services;
pub mod subscriptions;
pub mod user_details;
pub mod user_logins;
pub mod users;

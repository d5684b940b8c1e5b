pub mod auth;
pub mod dashboard;
pub mod health;
pub mod issue;
pub mod occupancy;
pub mod payment;
pub mod room;
pub mod user;

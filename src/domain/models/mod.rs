pub mod auth;
pub mod issue;
pub mod occupancy;
pub mod payment;
pub mod room;
pub mod user;
pub mod verification;

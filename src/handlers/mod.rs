pub mod auth;
pub mod availability;
pub mod bookings;
pub mod customers;
pub mod dashboard;
pub mod health;
pub mod services;
pub mod slots;

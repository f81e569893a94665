pub mod availability;
pub mod booking;
pub mod customer;
pub mod provider;
pub mod service;
pub mod weekday;

pub use availability::AvailabilityWindow;
pub use booking::{Booking, BookingStatus, CreatedBy};
pub use customer::Customer;
pub use provider::Provider;
pub use service::Service;
pub use weekday::Weekday;

pub mod availability;
pub mod catalog;
pub mod desk;
pub mod session;

pub use crate::domain::model::{
    Booking, BookingStatus, Car, RangeInput, RequestedRange, Reservation, ReservationInterval, Vehicle,
};
pub use crate::domain::ports::{AccountService, AdminService, BookingService, CatalogSource, ConfigProvider};
pub use crate::utils::error::Result;

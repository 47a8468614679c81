use crate::domain::model::{
    ApiMessage, Booking, BookingId, BookingRequest, BoundaryPolicy, CarListing, Credentials,
    CustomerId, LoginResponse, NewAdmin, NewCar, NewCustomer, StatusPolicy,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait ConfigProvider: Send + Sync {
    fn api_base(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn boundary_policy(&self) -> BoundaryPolicy;
    fn status_policy(&self) -> StatusPolicy;
}

/// Supplies vehicles together with the reservations currently held on them.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Vec<CarListing>>;
}

/// Owns authoritative booking state. May reject a request the client considered available.
#[async_trait]
pub trait BookingService: Send + Sync {
    async fn submit_booking(&self, request: &BookingRequest) -> Result<ApiMessage>;
    async fn customer_bookings(&self, customer_id: CustomerId) -> Result<Vec<Booking>>;
    async fn cancel_as_customer(&self, booking_id: BookingId) -> Result<ApiMessage>;
}

#[async_trait]
pub trait AdminService: Send + Sync {
    async fn admin_login(&self, credentials: &Credentials) -> Result<LoginResponse>;
    async fn add_admin(&self, admin: &NewAdmin) -> Result<ApiMessage>;
    async fn add_car(&self, car: &NewCar) -> Result<ApiMessage>;
    async fn all_bookings(&self) -> Result<Vec<Booking>>;
    async fn cancel_booking(&self, booking_id: BookingId) -> Result<ApiMessage>;
    async fn complete_booking(&self, booking_id: BookingId) -> Result<ApiMessage>;
}

#[async_trait]
pub trait AccountService: Send + Sync {
    async fn register_customer(&self, customer: &NewCustomer) -> Result<ApiMessage>;
    async fn customer_login(&self, credentials: &Credentials) -> Result<LoginResponse>;
}

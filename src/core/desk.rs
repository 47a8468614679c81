use crate::core::availability::AvailabilityFilter;
use crate::core::catalog::{normalize_catalog, CatalogSnapshot};
use crate::core::session::{Role, SessionState};
use crate::domain::model::{
    ApiMessage, Booking, BookingAction, BookingId, BookingRequest, Car, Credentials, CustomerId,
    NewAdmin, NewCar, NewCustomer, RangeInput, VehicleId,
};
use crate::domain::ports::{AccountService, AdminService, BookingService, CatalogSource, ConfigProvider};
use crate::utils::error::{RentalError, Result};
use crate::utils::validation::{validate_email, validate_non_empty_string, validate_positive_price};

/// Drives the customer and admin flows on top of a backend implementation.
pub struct BookingDesk<A> {
    api: A,
    filter: AvailabilityFilter,
}

impl<A> BookingDesk<A> {
    pub fn new(api: A, filter: AvailabilityFilter) -> Self {
        Self { api, filter }
    }

    pub fn from_config<C: ConfigProvider>(api: A, config: &C) -> Self {
        Self::new(
            api,
            AvailabilityFilter::new(config.status_policy(), config.boundary_policy()),
        )
    }

    pub fn filter(&self) -> &AvailabilityFilter {
        &self.filter
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}

/// A `{error}` body counts as a failure even when the transport succeeded.
fn accepted(reply: ApiMessage) -> Result<ApiMessage> {
    match reply.error {
        Some(reason) => Err(RentalError::Rejected { reason }),
        None => Ok(reply),
    }
}

fn find_booking(bookings: Vec<Booking>, booking_id: BookingId) -> Result<Booking> {
    bookings
        .into_iter()
        .find(|b| b.id == booking_id)
        .ok_or_else(|| RentalError::NotFound {
            what: format!("Booking #{}", booking_id),
        })
}

impl<A: CatalogSource> BookingDesk<A> {
    pub async fn catalog(&self) -> Result<CatalogSnapshot> {
        let listings = self.api.fetch_catalog().await?;
        tracing::debug!("Fetched {} car listings", listings.len());
        Ok(normalize_catalog(listings))
    }

    /// Cars free for the range. Empty while the range is unset or invalid.
    pub async fn available_cars(&self, input: &RangeInput) -> Result<Vec<Car>> {
        let snapshot = self.catalog().await?;
        let vehicles = self.filter.filter_available(&snapshot.vehicles, input);
        Ok(snapshot.cars_for(&vehicles))
    }
}

impl<A: CatalogSource + BookingService> BookingDesk<A> {
    /// Checks the car against a fresh catalog before submitting.
    ///
    /// The backend stays authoritative: a concurrent booking can still make it refuse.
    pub async fn book(&self, customer_id: CustomerId, car_id: VehicleId, input: &RangeInput) -> Result<ApiMessage> {
        let range = input.resolve()?;
        let snapshot = self.catalog().await?;

        let vehicle = snapshot.vehicle(car_id).ok_or_else(|| RentalError::NotFound {
            what: format!("Car {}", car_id),
        })?;
        if !self.filter.is_available(vehicle, &range) {
            return Err(RentalError::Unavailable {
                car_id,
                start: range.start().to_string(),
                end: range.end().to_string(),
            });
        }

        let request = BookingRequest::new(customer_id, car_id, &range);
        tracing::info!(customer_id, car_id, "Submitting booking for {}", range);
        let reply = accepted(self.api.submit_booking(&request).await?)?;
        tracing::info!("Booking accepted for car {}", car_id);
        Ok(reply)
    }

    pub async fn customer_bookings(&self, customer_id: CustomerId) -> Result<Vec<Booking>> {
        self.api.customer_bookings(customer_id).await
    }

    pub async fn cancel_as_customer(&self, customer_id: CustomerId, booking_id: BookingId) -> Result<ApiMessage> {
        let booking = find_booking(self.api.customer_bookings(customer_id).await?, booking_id)?;
        let next = booking.status.known()?.apply(BookingAction::CancelByCustomer)?;

        tracing::info!(customer_id, booking_id, "Cancelling booking ({} -> {})", booking.status, next);
        accepted(self.api.cancel_as_customer(booking_id).await?)
    }
}

impl<A: AdminService> BookingDesk<A> {
    pub async fn all_bookings(&self) -> Result<Vec<Booking>> {
        self.api.all_bookings().await
    }

    pub async fn complete_booking(&self, booking_id: BookingId) -> Result<ApiMessage> {
        self.admin_transition(booking_id, BookingAction::Complete).await
    }

    pub async fn cancel_booking(&self, booking_id: BookingId) -> Result<ApiMessage> {
        self.admin_transition(booking_id, BookingAction::Cancel).await
    }

    async fn admin_transition(&self, booking_id: BookingId, action: BookingAction) -> Result<ApiMessage> {
        let booking = find_booking(self.api.all_bookings().await?, booking_id)?;
        let next = booking.status.known()?.apply(action)?;

        tracing::info!(booking_id, "Admin {}: {} -> {}", action, booking.status, next);
        let reply = match action {
            BookingAction::Complete => self.api.complete_booking(booking_id).await?,
            BookingAction::Cancel | BookingAction::CancelByCustomer => {
                self.api.cancel_booking(booking_id).await?
            }
        };
        accepted(reply)
    }

    pub async fn add_car(&self, car: &NewCar) -> Result<ApiMessage> {
        validate_non_empty_string("model", &car.model)?;
        validate_non_empty_string("brand", &car.brand)?;
        validate_positive_price("price_per_day", car.price_per_day)?;

        tracing::info!("Adding car {} {}", car.brand, car.model);
        accepted(self.api.add_car(car).await?)
    }

    pub async fn add_admin(&self, admin: &NewAdmin) -> Result<ApiMessage> {
        validate_non_empty_string("name", &admin.name)?;
        validate_email("email", &admin.email)?;
        validate_non_empty_string("password", &admin.password)?;

        accepted(self.api.add_admin(admin).await?)
    }
}

impl<A: AccountService> BookingDesk<A> {
    pub async fn register_customer(&self, customer: &NewCustomer) -> Result<ApiMessage> {
        validate_non_empty_string("name", &customer.name)?;
        validate_email("email", &customer.email)?;
        validate_non_empty_string("mobile", &customer.mobile)?;
        validate_non_empty_string("password", &customer.password)?;

        accepted(self.api.register_customer(customer).await?)
    }
}

impl<A: AccountService + AdminService> BookingDesk<A> {
    pub async fn login(&self, role: Role, credentials: &Credentials) -> Result<SessionState> {
        validate_email("email", &credentials.email)?;
        validate_non_empty_string("password", &credentials.password)?;

        tracing::debug!("Session view: {:?}", SessionState::login_view(role));
        let response = match role {
            Role::Admin => self.api.admin_login(credentials).await?,
            Role::Customer => self.api.customer_login(credentials).await?,
        };
        let state = SessionState::after_login(role, &response, &credentials.email)?;
        tracing::info!("Logged in as {:?} '{}'", role, state.user_name());
        Ok(state)
    }
}

use crate::domain::model::{
    ApiMessage, Booking, BookingId, BookingRequest, CarListing, Credentials, CustomerId,
    LoginResponse, NewAdmin, NewCar, NewCustomer,
};
use crate::domain::ports::{AccountService, AdminService, BookingService, CatalogSource, ConfigProvider};
use crate::utils::error::{RentalError, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// REST client for the rental backend. Implements every port.
#[derive(Debug, Clone)]
pub struct RentalApiClient {
    base_url: String,
    client: Client,
}

impl RentalApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.api_base(), Duration::from_secs(config.timeout_seconds()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        tracing::debug!("Response status: {}", response.status());
        read_json(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send::<T, ()>(Method::GET, path, None).await
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn put<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send::<T, ()>(Method::PUT, path, None).await
    }
}

/// Maps non-2xx statuses and `{error}` bodies to [`RentalError::Rejected`].
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let reason = serde_json::from_str::<ApiMessage>(&body)
            .ok()
            .and_then(|m| m.error)
            .unwrap_or_else(|| format!("HTTP {}", status));
        tracing::warn!("Server rejected request: {}", reason);
        return Err(RentalError::Rejected { reason });
    }

    match serde_json::from_str::<T>(&body) {
        Ok(value) => Ok(value),
        Err(parse_error) => match serde_json::from_str::<ApiMessage>(&body) {
            // 200 但回傳 {error}，例如查無資料
            Ok(ApiMessage {
                error: Some(reason), ..
            }) => Err(RentalError::Rejected { reason }),
            _ => Err(RentalError::SerializationError(parse_error)),
        },
    }
}

#[async_trait]
impl CatalogSource for RentalApiClient {
    async fn fetch_catalog(&self) -> Result<Vec<CarListing>> {
        self.get("/cars_with_bookings").await
    }
}

#[async_trait]
impl BookingService for RentalApiClient {
    async fn submit_booking(&self, request: &BookingRequest) -> Result<ApiMessage> {
        self.post("/customer/rent", request).await
    }

    async fn customer_bookings(&self, customer_id: CustomerId) -> Result<Vec<Booking>> {
        self.get(&format!("/customer/bookings/{}", customer_id)).await
    }

    async fn cancel_as_customer(&self, booking_id: BookingId) -> Result<ApiMessage> {
        self.put(&format!("/customer/cancel_booking/{}", booking_id)).await
    }
}

#[async_trait]
impl AdminService for RentalApiClient {
    async fn admin_login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        self.post("/admin/login", credentials).await
    }

    async fn add_admin(&self, admin: &NewAdmin) -> Result<ApiMessage> {
        self.post("/admin/add", admin).await
    }

    async fn add_car(&self, car: &NewCar) -> Result<ApiMessage> {
        self.post("/admin/add_car", car).await
    }

    async fn all_bookings(&self) -> Result<Vec<Booking>> {
        self.get("/admin/bookings").await
    }

    async fn cancel_booking(&self, booking_id: BookingId) -> Result<ApiMessage> {
        self.put(&format!("/admin/cancel_booking/{}", booking_id)).await
    }

    async fn complete_booking(&self, booking_id: BookingId) -> Result<ApiMessage> {
        self.put(&format!("/admin/complete_booking/{}", booking_id)).await
    }
}

#[async_trait]
impl AccountService for RentalApiClient {
    async fn register_customer(&self, customer: &NewCustomer) -> Result<ApiMessage> {
        self.post("/customer/register", customer).await
    }

    async fn customer_login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        self.post("/customer/login", credentials).await
    }
}

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::{ApiError, FetchError};
use crate::api::models::{
    Booking, BookingCheck, NewBooking, NewService, ProfileUpdate, Review, Service, ServiceFilter,
    ServiceUpdate, Testimonial, UserProfile,
};
use crate::api::retry::{with_retry, RetryPolicy};

/// HTTP client for the HomeHero backend.
///
/// Reads of remote collections retry on any failure per the configured
/// [`RetryPolicy`]; mutations make exactly one attempt.
pub struct ApiClient {
    http: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        retry: RetryPolicy,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self {
            http,
            base_url,
            retry,
        })
    }

    // --- services ---

    pub async fn list_services(&self, filter: ServiceFilter) -> Result<Vec<Service>, FetchError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(min) = filter.min_price {
            query.push(("minPrice", min.to_string()));
        }
        if let Some(max) = filter.max_price {
            query.push(("maxPrice", max.to_string()));
        }
        with_retry(self.retry, || self.get_json("/services", &query)).await
    }

    pub async fn get_service(&self, id: &str) -> Result<Service, FetchError> {
        let path = format!("/services/{id}");
        with_retry(self.retry, || self.get_json(&path, &[])).await
    }

    pub async fn provider_services(&self, email: &str) -> Result<Vec<Service>, FetchError> {
        let query = [("email", email.to_string())];
        with_retry(self.retry, || self.get_json("/provider/services", &query)).await
    }

    pub async fn create_service(&self, service: &NewService) -> Result<(), ApiError> {
        self.send_json(reqwest::Method::POST, "/services", service)
            .await?;
        Ok(())
    }

    pub async fn update_service(&self, id: &str, update: &ServiceUpdate) -> Result<(), ApiError> {
        self.send_json(reqwest::Method::PATCH, &format!("/services/{id}"), update)
            .await?;
        Ok(())
    }

    /// Deletes a service. The backend authorizes against the `email` in the
    /// body; a mismatch comes back as a non-success status.
    pub async fn delete_service(&self, id: &str, email: &str) -> Result<(), ApiError> {
        self.send_json(
            reqwest::Method::DELETE,
            &format!("/services/{id}"),
            &serde_json::json!({ "email": email }),
        )
        .await?;
        Ok(())
    }

    pub async fn add_review(&self, service_id: &str, review: &Review) -> Result<(), ApiError> {
        self.send_json(
            reqwest::Method::PATCH,
            &format!("/services/{service_id}/reviews"),
            &serde_json::json!({ "review": review }),
        )
        .await?;
        Ok(())
    }

    // --- bookings ---

    pub async fn bookings(&self, email: &str) -> Result<Vec<Booking>, FetchError> {
        let query = [("email", email.to_string())];
        with_retry(self.retry, || self.get_json("/bookings", &query)).await
    }

    pub async fn create_booking(&self, booking: &NewBooking) -> Result<(), ApiError> {
        self.send_json(reqwest::Method::POST, "/bookings", booking)
            .await?;
        Ok(())
    }

    pub async fn cancel_booking(&self, id: &str) -> Result<(), ApiError> {
        let resp = self
            .request(reqwest::Method::DELETE, &format!("/bookings/{id}"))
            .send()
            .await?;
        let body: serde_json::Value = Self::decode(resp).await?;
        // The backend answers 200 with a delete count either way.
        if body.get("deletedCount").and_then(|v| v.as_u64()) == Some(0) {
            return Err(ApiError::Status {
                status: 404,
                message: "booking not found".to_string(),
            });
        }
        Ok(())
    }

    pub async fn check_booking(
        &self,
        user_email: &str,
        service_id: &str,
    ) -> Result<bool, FetchError> {
        let query = [
            ("userEmail", user_email.to_string()),
            ("serviceId", service_id.to_string()),
        ];
        let check: BookingCheck =
            with_retry(self.retry, || self.get_json("/bookings/check", &query)).await?;
        Ok(check.booked)
    }

    // --- profile mirror ---

    /// Single-attempt profile read. Session resolution supplies its own
    /// fallback when this fails, so it does not burn the retry budget.
    pub async fn get_profile(&self, email: &str) -> Result<UserProfile, ApiError> {
        self.get_json(&format!("/users/email/{email}"), &[]).await
    }

    pub async fn update_profile(
        &self,
        email: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        let resp = self
            .send_json(
                reqwest::Method::PATCH,
                &format!("/users/email/{email}"),
                update,
            )
            .await?;
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    // --- misc ---

    pub async fn testimonials(&self) -> Result<Vec<Testimonial>, FetchError> {
        with_retry(self.retry, || self.get_json("/testimonials", &[])).await
    }

    // --- plumbing ---

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let request_id = Uuid::new_v4();
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%request_id, %method, %url, "backend request");
        self.http
            .request(method, url)
            .header("x-request-id", request_id.to_string())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let resp = self
            .request(reqwest::Method::GET, path)
            .query(query)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<Response, ApiError> {
        let resp = self.request(method, path).json(body).send().await?;
        Self::check_status(resp).await
    }

    async fn check_status(resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        let resp = Self::check_status(resp).await?;
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

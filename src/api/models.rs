//! Wire types for the HomeHero backend (JSON, camelCase keys).

use serde::{Deserialize, Serialize};

/// A listed service as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(rename = "_id")]
    pub id: String,
    pub service_name: String,
    pub category: String,
    pub price: f64,
    pub description: String,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub estimated_duration: Option<String>,
    #[serde(default)]
    pub customer_benefits: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub what_included: Vec<String>,
    #[serde(default)]
    pub provider_name: Option<String>,
    /// Provider identity; the ownership key for edit/delete and the
    /// "your service" marker in listings.
    pub email: String,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Service {
    /// Mean review rating, `None` when there are no reviews yet.
    pub fn average_rating(&self) -> Option<f64> {
        if self.reviews.is_empty() {
            return None;
        }
        let sum: u32 = self.reviews.iter().map(|r| u32::from(r.rating)).sum();
        Some(f64::from(sum) / self.reviews.len() as f64)
    }
}

/// A customer review appended to a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub user_email: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    pub created_at: String,
}

/// Body for `POST /services`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewService {
    pub service_name: String,
    pub category: String,
    pub price: f64,
    pub description: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_benefits: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub what_included: Vec<String>,
    pub provider_name: String,
    pub email: String,
}

/// Partial body for `PATCH /services/:id`.
///
/// `email` is the acting provider identity the backend authorizes against.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub email: String,
}

/// Price bounds for the services listing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ServiceFilter {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

/// A booking row for the current customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,
    pub service_id: String,
    pub service_name: String,
    #[serde(default)]
    pub provider_name: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub booking_date: Option<String>,
    pub user_email: String,
}

/// Body for `POST /bookings`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub service_id: String,
    pub service_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    pub price: f64,
    pub user_email: String,
    pub booking_date: String,
}

/// Response of `GET /bookings/check`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct BookingCheck {
    #[serde(default)]
    pub booked: bool,
}

/// A homepage testimonial.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub rating: Option<u8>,
}

/// The backend's mutable profile mirror, joined to the identity provider
/// record by email. Unknown fields pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
    #[serde(default, rename = "lastLoginAt")]
    pub last_login_at: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body for `PATCH /users/email/:email`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_deserializes_with_sparse_fields() {
        let json = r#"{
            "_id": "abc123",
            "serviceName": "Pipe Repair",
            "category": "Plumbing",
            "price": 450,
            "description": "Fix leaky pipes",
            "email": "pro@x.com"
        }"#;
        let service: Service = serde_json::from_str(json).unwrap();
        assert_eq!(service.id, "abc123");
        assert_eq!(service.service_name, "Pipe Repair");
        assert!(service.reviews.is_empty());
        assert!(service.what_included.is_empty());
        assert_eq!(service.average_rating(), None);
    }

    #[test]
    fn average_rating_over_reviews() {
        let json = r#"{
            "_id": "abc",
            "serviceName": "s",
            "category": "c",
            "price": 1,
            "description": "d",
            "email": "e@x.com",
            "reviews": [
                {"userEmail": "a@x.com", "rating": 5, "createdAt": "2026-01-01"},
                {"userEmail": "b@x.com", "rating": 4, "createdAt": "2026-01-02"}
            ]
        }"#;
        let service: Service = serde_json::from_str(json).unwrap();
        assert_eq!(service.average_rating(), Some(4.5));
    }

    #[test]
    fn service_update_skips_absent_fields() {
        let update = ServiceUpdate {
            price: Some(500.0),
            email: "pro@x.com".to_string(),
            ..Default::default()
        };
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body["price"], 500.0);
        assert_eq!(body["email"], "pro@x.com");
        assert!(body.get("serviceName").is_none());
    }

    #[test]
    fn profile_passes_unknown_fields_through() {
        let json = r#"{"name": "Rina", "memberTier": "gold"}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.name.as_deref(), Some("Rina"));
        assert_eq!(profile.extra["memberTier"], "gold");
        assert!(profile.last_login_at.is_none());
    }
}

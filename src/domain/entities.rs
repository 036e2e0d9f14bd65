//! Domain entities mirrored from persistent storage.
//!
//! Records are serialized into response envelopes and into the response cache,
//! so every timestamp uses RFC 3339 in both directions.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

time::serde::format_description!(calendar_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub job_type: String,
    pub experience_level: String,
    pub salary_range: Option<String>,
    pub requirements: String,
    pub responsibilities: String,
    pub benefits: Option<String>,
    pub status: i16,
    pub posted_by: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogRecord {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub author_id: i64,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: i16,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FranchiseRecord {
    pub id: i64,
    pub contact_person: String,
    pub business_name: Option<String>,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub state: Option<String>,
    pub investment_capacity: Option<i64>,
    pub message: Option<String>,
    pub status: i16,
    pub notes: Option<String>,
    pub assigned_to: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A payment row; `amount` is in minor currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: i64,
    pub transaction_id: String,
    pub user_id: Option<i64>,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub payment_method: String,
    pub payment_gateway: String,
    pub gateway_transaction_id: Option<String>,
    pub status: String,
    pub description: Option<String>,
    pub subscription_id: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLoginRecord {
    pub id: i64,
    pub user_id: Option<i64>,
    pub email: String,
    pub device_type: String,
    pub device_id: Option<String>,
    pub platform: String,
    pub app_version: Option<String>,
    pub ip_address: Option<String>,
    pub location: Option<String>,
    pub login_status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub login_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub logout_time: Option<OffsetDateTime>,
    pub session_duration: Option<i32>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Account listing view. Password material never leaves the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub phone: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub status: i16,
    pub email_verified: bool,
    pub phone_verified: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub subscription_id: String,
    pub user_id: String,
    pub cms_user_id: Option<i64>,
    pub plan_id: String,
    pub base_amount: i64,
    pub discount_amount: i64,
    pub total_amount: i64,
    pub coupon_code: Option<String>,
    pub discount_type: Option<String>,
    pub razorpay_order_id: Option<String>,
    pub payment_status: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub start_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Lead captured by the brand website before an app account exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDetailsRecord {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(with = "calendar_date::option")]
    pub dob: Option<Date>,
    pub gender: Option<String>,
    pub cms_user_id: Option<i64>,
    pub source: Option<String>,
    pub otp_verified: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

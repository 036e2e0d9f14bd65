//! Query strings and request bodies accepted by the HTTP surface.
//!
//! Query parameters arrive as raw strings so that malformed numbers degrade
//! to "absent" instead of failing the request. Dates and booleans are
//! stricter: a value that cannot be parsed is a 400.

use serde::{Deserialize, Deserializer};
use time::{Date, OffsetDateTime, macros::format_description};

use crate::application::blogs::{BlogFilter, CreateBlogCommand, UpdateBlogCommand};
use crate::application::careers::{CareerFilter, CreateCareerCommand};
use crate::application::contacts::{ContactFilter, CreateContactCommand};
use crate::application::franchise::{
    CreateFranchiseCommand, FranchiseFilter, UpdateFranchiseStatusCommand,
};
use crate::application::pagination::PageWindow;
use crate::application::payments::PaymentFilter;
use crate::application::repos::UpdateCareerParams;
use crate::application::subscriptions::{CreateSubscriptionCommand, SubscriptionFilter};
use crate::application::user_details::CreateUserDetailsCommand;
use crate::application::user_logins::UserLoginFilter;
use crate::application::users::UserFilter;
use crate::domain::error::DomainError;

/// Leading integer of `raw`, e.g. `"12abc"` is 12; anything else is absent.
pub fn lenient_int(raw: Option<&str>) -> Option<i64> {
    let trimmed = raw?.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first()? {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .bytes()
        .position(|byte| !byte.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// `YYYY-MM-DD`; blank is absent.
pub fn parse_date(raw: Option<&str>, field: &str) -> Result<Option<Date>, DomainError> {
    let Some(raw) = non_blank(raw) else {
        return Ok(None);
    };
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map(Some)
        .map_err(|_| DomainError::validation(format!("`{field}` must be a date (YYYY-MM-DD)")))
}

pub fn parse_flag(raw: Option<&str>, field: &str) -> Result<Option<bool>, DomainError> {
    match non_blank(raw) {
        None => Ok(None),
        Some("true" | "1") => Ok(Some(true)),
        Some("false" | "0") => Ok(Some(false)),
        Some(_) => Err(DomainError::validation(format!(
            "`{field}` must be true or false"
        ))),
    }
}

/// Path identifiers must be positive integers.
pub fn parse_id(raw: &str, entity: &str) -> Result<i64, DomainError> {
    match lenient_int(Some(raw)) {
        Some(id) if id > 0 => Ok(id),
        _ => Err(DomainError::validation(format!("Invalid {entity} ID"))),
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

fn text(raw: Option<String>) -> Option<String> {
    raw.filter(|value| !value.trim().is_empty())
}

/// Body field where `null` means "clear" and a missing key means "keep".
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn window(&self) -> PageWindow {
        PageWindow::clamp(
            lenient_int(self.page.as_deref()),
            lenient_int(self.limit.as_deref()),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CareerQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub status: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub posted_by: Option<String>,
    pub search: Option<String>,
}

impl CareerQuery {
    pub fn into_filter(self) -> CareerFilter {
        CareerFilter {
            status: lenient_int(self.status.as_deref()),
            location: text(self.location),
            job_type: text(self.job_type),
            experience_level: text(self.experience_level),
            posted_by: lenient_int(self.posted_by.as_deref()),
            search: text(self.search),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BlogQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub status: Option<String>,
    pub category: Option<String>,
    pub author_id: Option<String>,
    pub search: Option<String>,
    /// Comma separated.
    pub tags: Option<String>,
}

impl BlogQuery {
    pub fn into_filter(self) -> BlogFilter {
        let tags = self.tags.map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });
        BlogFilter {
            status: lenient_int(self.status.as_deref()),
            category: text(self.category),
            author_id: lenient_int(self.author_id.as_deref()),
            search: text(self.search),
            tags: tags.filter(|tags| !tags.is_empty()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ContactQuery {
    pub fn into_filter(self) -> Result<ContactFilter, DomainError> {
        Ok(ContactFilter {
            start_date: parse_date(self.start_date.as_deref(), "start_date")?,
            end_date: parse_date(self.end_date.as_deref(), "end_date")?,
            first_name: text(self.first_name),
            last_name: text(self.last_name),
            email: text(self.email),
            phone: text(self.phone),
            search: text(self.search),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FranchiseQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub status: Option<String>,
    pub assigned_to: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub search: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub investment_capacity_min: Option<String>,
    pub investment_capacity_max: Option<String>,
}

impl FranchiseQuery {
    pub fn into_filter(self) -> Result<FranchiseFilter, DomainError> {
        Ok(FranchiseFilter {
            date_from: parse_date(self.date_from.as_deref(), "date_from")?,
            date_to: parse_date(self.date_to.as_deref(), "date_to")?,
            status: lenient_int(self.status.as_deref()),
            assigned_to: lenient_int(self.assigned_to.as_deref()),
            city: text(self.city),
            state: text(self.state),
            search: text(self.search),
            investment_capacity_min: lenient_int(self.investment_capacity_min.as_deref()),
            investment_capacity_max: lenient_int(self.investment_capacity_max.as_deref()),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PaymentQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub transaction_id: Option<String>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub payment_gateway: Option<String>,
    pub subscription_id: Option<String>,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl PaymentQuery {
    pub fn into_filter(self) -> Result<PaymentFilter, DomainError> {
        Ok(PaymentFilter {
            start_date: parse_date(self.start_date.as_deref(), "start_date")?,
            end_date: parse_date(self.end_date.as_deref(), "end_date")?,
            user_id: lenient_int(self.user_id.as_deref()),
            user_email: text(self.user_email),
            transaction_id: text(self.transaction_id),
            status: text(self.status),
            payment_method: text(self.payment_method),
            payment_gateway: text(self.payment_gateway),
            subscription_id: text(self.subscription_id),
            min_amount: lenient_int(self.min_amount.as_deref()),
            max_amount: lenient_int(self.max_amount.as_deref()),
            search: text(self.search),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UserLoginQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub email: Option<String>,
    pub device_type: Option<String>,
    pub platform: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl UserLoginQuery {
    pub fn into_filter(self) -> Result<UserLoginFilter, DomainError> {
        Ok(UserLoginFilter {
            start_date: parse_date(self.start_date.as_deref(), "start_date")?,
            end_date: parse_date(self.end_date.as_deref(), "end_date")?,
            email: text(self.email),
            device_type: text(self.device_type),
            platform: text(self.platform),
            search: text(self.search),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
    pub email_verified: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl UserQuery {
    pub fn into_filter(self) -> Result<UserFilter, DomainError> {
        Ok(UserFilter {
            email_verified: parse_flag(self.email_verified.as_deref(), "email_verified")?,
            start_date: parse_date(self.start_date.as_deref(), "start_date")?,
            end_date: parse_date(self.end_date.as_deref(), "end_date")?,
            email: text(self.email),
            phone: text(self.phone),
            status: lenient_int(self.status.as_deref()),
            search: text(self.search),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub user_id: Option<String>,
    pub cms_user_id: Option<String>,
    pub plan_id: Option<String>,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl SubscriptionQuery {
    pub fn into_filter(self) -> Result<SubscriptionFilter, DomainError> {
        Ok(SubscriptionFilter {
            start_date: parse_date(self.start_date.as_deref(), "start_date")?,
            end_date: parse_date(self.end_date.as_deref(), "end_date")?,
            user_id: text(self.user_id),
            cms_user_id: lenient_int(self.cms_user_id.as_deref()),
            plan_id: text(self.plan_id),
            status: text(self.status),
            payment_status: text(self.payment_status),
            search: text(self.search),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CareerCreateRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    pub job_type: String,
    pub experience_level: String,
    pub salary_range: Option<String>,
    pub requirements: String,
    pub responsibilities: String,
    pub benefits: Option<String>,
    pub status: Option<i16>,
    pub posted_by: Option<i64>,
}

impl TryFrom<CareerCreateRequest> for CreateCareerCommand {
    type Error = DomainError;

    fn try_from(request: CareerCreateRequest) -> Result<Self, Self::Error> {
        let posted_by = request
            .posted_by
            .ok_or_else(|| DomainError::required("posted_by"))?;
        Ok(Self {
            title: request.title,
            description: request.description,
            location: request.location,
            job_type: request.job_type,
            experience_level: request.experience_level,
            salary_range: request.salary_range,
            requirements: request.requirements,
            responsibilities: request.responsibilities,
            benefits: request.benefits,
            status: request.status,
            posted_by,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CareerUpdateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub salary_range: Option<Option<String>>,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub benefits: Option<Option<String>>,
    pub status: Option<i16>,
}

impl From<CareerUpdateRequest> for UpdateCareerParams {
    fn from(request: CareerUpdateRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            location: request.location,
            job_type: request.job_type,
            experience_level: request.experience_level,
            salary_range: request.salary_range,
            requirements: request.requirements,
            responsibilities: request.responsibilities,
            benefits: request.benefits,
            status: request.status,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BlogCreateRequest {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub author_id: Option<i64>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: Option<i16>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
}

impl TryFrom<BlogCreateRequest> for CreateBlogCommand {
    type Error = DomainError;

    fn try_from(request: BlogCreateRequest) -> Result<Self, Self::Error> {
        let author_id = request
            .author_id
            .ok_or_else(|| DomainError::required("author_id"))?;
        Ok(Self {
            title: request.title,
            content: request.content,
            excerpt: request.excerpt,
            featured_image: request.featured_image,
            author_id,
            category: request.category,
            tags: request.tags,
            meta_title: request.meta_title,
            meta_description: request.meta_description,
            status: request.status,
            published_at: request.published_at,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BlogUpdateRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub excerpt: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub featured_image: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub category: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    #[serde(deserialize_with = "nullable")]
    pub meta_title: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub meta_description: Option<Option<String>>,
    pub status: Option<i16>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
}

impl From<BlogUpdateRequest> for UpdateBlogCommand {
    fn from(request: BlogUpdateRequest) -> Self {
        Self {
            title: request.title,
            content: request.content,
            excerpt: request.excerpt,
            featured_image: request.featured_image,
            category: request.category,
            tags: request.tags,
            meta_title: request.meta_title,
            meta_description: request.meta_description,
            status: request.status,
            published_at: request.published_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FranchiseStatusRequest {
    pub status: Option<i16>,
    pub notes: Option<String>,
    pub assigned_to: Option<i64>,
}

impl TryFrom<FranchiseStatusRequest> for UpdateFranchiseStatusCommand {
    type Error = DomainError;

    fn try_from(request: FranchiseStatusRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            status: request.status.ok_or_else(|| DomainError::required("status"))?,
            notes: request.notes,
            assigned_to: request.assigned_to,
        })
    }
}

/// Public "contact us" form.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactRequest {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: String,
    pub message: Option<String>,
}

impl TryFrom<ContactRequest> for CreateContactCommand {
    type Error = DomainError;

    fn try_from(request: ContactRequest) -> Result<Self, Self::Error> {
        if request.first_name.trim().is_empty() || request.phone.trim().is_empty() {
            return Err(DomainError::validation("First name and phone are required"));
        }
        Ok(Self {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            message: request.message,
        })
    }
}

/// Public franchise inquiry form.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FranchiseRequest {
    pub full_name: String,
    pub business_name: Option<String>,
    pub email_address: String,
    pub phone_number: String,
    pub proposed_city: String,
    pub state: Option<String>,
    pub investment_capacity: Option<i64>,
    pub additional_message: Option<String>,
}

impl TryFrom<FranchiseRequest> for CreateFranchiseCommand {
    type Error = DomainError;

    fn try_from(request: FranchiseRequest) -> Result<Self, Self::Error> {
        let missing = [
            &request.full_name,
            &request.email_address,
            &request.phone_number,
            &request.proposed_city,
        ]
        .iter()
        .any(|value| value.trim().is_empty());
        if missing {
            return Err(DomainError::validation(
                "Full name, email, phone number and city are required",
            ));
        }
        Ok(Self {
            contact_person: request.full_name,
            business_name: request.business_name,
            email: request.email_address,
            phone: request.phone_number,
            city: request.proposed_city,
            state: request.state,
            investment_capacity: request.investment_capacity,
            message: Some(request.additional_message.unwrap_or_default()),
        })
    }
}

/// Checkout record posted by the brand website.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubscriptionRequest {
    pub subscription_id: String,
    pub user_id: String,
    pub cms_user_id: Option<i64>,
    pub plan_id: String,
    pub base_amount: Option<i64>,
    pub discount_amount: Option<i64>,
    pub coupon_code: Option<String>,
    pub discount_type: Option<String>,
    pub razorpay_order_id: Option<String>,
}

impl TryFrom<SubscriptionRequest> for CreateSubscriptionCommand {
    type Error = DomainError;

    fn try_from(request: SubscriptionRequest) -> Result<Self, Self::Error> {
        let missing = [&request.subscription_id, &request.user_id, &request.plan_id]
            .iter()
            .any(|value| value.trim().is_empty());
        let base_amount = match request.base_amount {
            Some(amount) if amount != 0 && !missing => amount,
            _ => {
                return Err(DomainError::validation(
                    "Subscription ID, user ID, plan ID and base amount are required",
                ));
            }
        };
        Ok(Self {
            subscription_id: request.subscription_id,
            user_id: request.user_id,
            cms_user_id: request.cms_user_id,
            plan_id: request.plan_id,
            base_amount,
            discount_amount: request.discount_amount,
            coupon_code: request.coupon_code,
            discount_type: request.discount_type,
            razorpay_order_id: request.razorpay_order_id,
        })
    }
}

/// Lead form posted by the brand website.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserDetailsRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub cms_user_id: Option<i64>,
    pub source: Option<String>,
    pub otp_verified: bool,
}

impl TryFrom<UserDetailsRequest> for CreateUserDetailsCommand {
    type Error = DomainError;

    fn try_from(request: UserDetailsRequest) -> Result<Self, Self::Error> {
        let missing = [&request.name, &request.phone, &request.email]
            .iter()
            .any(|value| value.trim().is_empty());
        if missing {
            return Err(DomainError::validation("Name, phone and email are required"));
        }
        Ok(Self {
            dob: parse_date(request.dob.as_deref(), "dob")?,
            name: request.name,
            phone: request.phone,
            email: request.email,
            gender: request.gender,
            cms_user_id: request.cms_user_id,
            source: request.source,
            otp_verified: request.otp_verified,
        })
    }
}

//! Member-facing tables: users, logins, payments, subscriptions and website
//! leads. Users, logins and payments are written by the member app and only
//! read here.

use async_trait::async_trait;
use sqlx::QueryBuilder;
use time::{Date, OffsetDateTime};

use crate::application::repos::{
    CreateSubscriptionParams, CreateUserDetailsParams, RepoError, SubscriptionsWriteRepo,
    UserDetailsWriteRepo,
};
use crate::domain::entities::{
    PaymentRecord, SubscriptionRecord, UserDetailsRecord, UserLoginRecord, UserRecord,
};

use super::PostgresRepositories;
use super::listing::Table;
use super::util::map_sqlx_error;

#[derive(sqlx::FromRow)]
pub struct PaymentRow {
    id: i64,
    transaction_id: String,
    user_id: Option<i64>,
    user_email: Option<String>,
    user_name: Option<String>,
    amount: i64,
    currency: String,
    payment_method: String,
    payment_gateway: String,
    gateway_transaction_id: Option<String>,
    status: String,
    description: Option<String>,
    subscription_id: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<PaymentRow> for PaymentRecord {
    fn from(row: PaymentRow) -> Self {
        Self {
            id: row.id,
            transaction_id: row.transaction_id,
            user_id: row.user_id,
            user_email: row.user_email,
            user_name: row.user_name,
            amount: row.amount,
            currency: row.currency,
            payment_method: row.payment_method,
            payment_gateway: row.payment_gateway,
            gateway_transaction_id: row.gateway_transaction_id,
            status: row.status,
            description: row.description,
            subscription_id: row.subscription_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl Table for PaymentRecord {
    const TABLE: &'static str = "payments";
    const COLUMNS: &'static str = "id, transaction_id, user_id, user_email, user_name, amount, \
        currency, payment_method, payment_gateway, gateway_transaction_id, status, description, \
        subscription_id, created_at, updated_at";

    type Row = PaymentRow;
}

#[derive(sqlx::FromRow)]
pub struct UserLoginRow {
    id: i64,
    user_id: Option<i64>,
    email: String,
    device_type: String,
    device_id: Option<String>,
    platform: String,
    app_version: Option<String>,
    ip_address: Option<String>,
    location: Option<String>,
    login_status: String,
    login_time: OffsetDateTime,
    logout_time: Option<OffsetDateTime>,
    session_duration: Option<i32>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<UserLoginRow> for UserLoginRecord {
    fn from(row: UserLoginRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            email: row.email,
            device_type: row.device_type,
            device_id: row.device_id,
            platform: row.platform,
            app_version: row.app_version,
            ip_address: row.ip_address,
            location: row.location,
            login_status: row.login_status,
            login_time: row.login_time,
            logout_time: row.logout_time,
            session_duration: row.session_duration,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl Table for UserLoginRecord {
    const TABLE: &'static str = "user_logins";
    const COLUMNS: &'static str = "id, user_id, email, device_type, device_id, platform, \
        app_version, ip_address, location, login_status, login_time, logout_time, \
        session_duration, created_at, updated_at";

    type Row = UserLoginRow;
}

/// Never selects `password_hash`.
#[derive(sqlx::FromRow)]
pub struct UserRow {
    id: i64,
    email: String,
    phone: Option<String>,
    first_name: String,
    last_name: String,
    gender: Option<String>,
    status: i16,
    email_verified: bool,
    phone_verified: bool,
    last_login_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            phone: row.phone,
            first_name: row.first_name,
            last_name: row.last_name,
            gender: row.gender,
            status: row.status,
            email_verified: row.email_verified,
            phone_verified: row.phone_verified,
            last_login_at: row.last_login_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl Table for UserRecord {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static str = "id, email, phone, first_name, last_name, gender, status, \
        email_verified, phone_verified, last_login_at, created_at, updated_at";

    type Row = UserRow;
}

#[derive(sqlx::FromRow)]
pub struct SubscriptionRow {
    subscription_id: String,
    user_id: String,
    cms_user_id: Option<i64>,
    plan_id: String,
    base_amount: i64,
    discount_amount: i64,
    total_amount: i64,
    coupon_code: Option<String>,
    discount_type: Option<String>,
    razorpay_order_id: Option<String>,
    payment_status: String,
    status: String,
    start_date: Option<OffsetDateTime>,
    end_date: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<SubscriptionRow> for SubscriptionRecord {
    fn from(row: SubscriptionRow) -> Self {
        Self {
            subscription_id: row.subscription_id,
            user_id: row.user_id,
            cms_user_id: row.cms_user_id,
            plan_id: row.plan_id,
            base_amount: row.base_amount,
            discount_amount: row.discount_amount,
            total_amount: row.total_amount,
            coupon_code: row.coupon_code,
            discount_type: row.discount_type,
            razorpay_order_id: row.razorpay_order_id,
            payment_status: row.payment_status,
            status: row.status,
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SUBSCRIPTION_COLUMNS: &str = "subscription_id, user_id, cms_user_id, plan_id, \
    base_amount, discount_amount, total_amount, coupon_code, discount_type, razorpay_order_id, \
    payment_status, status, start_date, end_date, created_at, updated_at";

impl Table for SubscriptionRecord {
    const TABLE: &'static str = "subscriptions";
    const COLUMNS: &'static str = SUBSCRIPTION_COLUMNS;

    type Row = SubscriptionRow;
}

#[async_trait]
impl SubscriptionsWriteRepo for PostgresRepositories {
    async fn create_subscription(
        &self,
        params: CreateSubscriptionParams,
    ) -> Result<SubscriptionRecord, RepoError> {
        let mut qb = QueryBuilder::new(
            "INSERT INTO subscriptions (subscription_id, user_id, cms_user_id, plan_id, \
             base_amount, discount_amount, total_amount, coupon_code, discount_type, \
             razorpay_order_id) ",
        );
        qb.push_values([params], |mut row, params| {
            row.push_bind(params.subscription_id)
                .push_bind(params.user_id)
                .push_bind(params.cms_user_id)
                .push_bind(params.plan_id)
                .push_bind(params.base_amount)
                .push_bind(params.discount_amount)
                .push_bind(params.total_amount)
                .push_bind(params.coupon_code)
                .push_bind(params.discount_type)
                .push_bind(params.razorpay_order_id);
        });
        qb.push(" RETURNING ");
        qb.push(SUBSCRIPTION_COLUMNS);

        let row = qb
            .build_query_as::<SubscriptionRow>()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.into())
    }
}

const USER_DETAILS_COLUMNS: &str =
    "id, name, phone, email, dob, gender, cms_user_id, source, otp_verified, created_at";

#[derive(sqlx::FromRow)]
pub struct UserDetailsRow {
    id: i64,
    name: String,
    phone: String,
    email: String,
    dob: Option<Date>,
    gender: Option<String>,
    cms_user_id: Option<i64>,
    source: Option<String>,
    otp_verified: bool,
    created_at: OffsetDateTime,
}

impl From<UserDetailsRow> for UserDetailsRecord {
    fn from(row: UserDetailsRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            dob: row.dob,
            gender: row.gender,
            cms_user_id: row.cms_user_id,
            source: row.source,
            otp_verified: row.otp_verified,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UserDetailsWriteRepo for PostgresRepositories {
    async fn create_user_details(
        &self,
        params: CreateUserDetailsParams,
    ) -> Result<UserDetailsRecord, RepoError> {
        let mut qb = QueryBuilder::new(
            "INSERT INTO user_details (name, phone, email, dob, gender, cms_user_id, source, \
             otp_verified) ",
        );
        qb.push_values([params], |mut row, params| {
            row.push_bind(params.name)
                .push_bind(params.phone)
                .push_bind(params.email)
                .push_bind(params.dob)
                .push_bind(params.gender)
                .push_bind(params.cms_user_id)
                .push_bind(params.source)
                .push_bind(params.otp_verified);
        });
        qb.push(" RETURNING ");
        qb.push(USER_DETAILS_COLUMNS);

        let row = qb
            .build_query_as::<UserDetailsRow>()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.into())
    }
}

//! Admin handlers. Every route here sits behind `require_admin`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::application::blogs::{CreateBlogCommand, UpdateBlogCommand};
use crate::application::careers::CreateCareerCommand;
use crate::application::envelope::{Envelope, ExportPayload, ItemPayload, ListPayload, messages};
use crate::application::error::ServiceError;
use crate::application::franchise::UpdateFranchiseStatusCommand;
use crate::application::resource::Resource;
use crate::domain::entities::{
    BlogRecord, CareerRecord, ContactRecord, FranchiseRecord, PaymentRecord, SubscriptionRecord,
    UserLoginRecord, UserRecord,
};

use crate::infra::http::error::{JsonBody, QueryParams};
use crate::infra::http::models::{
    BlogCreateRequest, BlogQuery, BlogUpdateRequest, CareerCreateRequest, CareerQuery,
    CareerUpdateRequest, ContactQuery, FranchiseQuery, FranchiseStatusRequest, PaymentQuery,
    SubscriptionQuery, UserLoginQuery, UserQuery, parse_id,
};
use crate::infra::http::state::HttpState;

type Listed<R> = Result<Envelope<ListPayload<R>>, ServiceError>;
type Exported<R> = Result<Envelope<ExportPayload<R>>, ServiceError>;
type Item<R> = Result<Envelope<ItemPayload<R>>, ServiceError>;

pub async fn list_careers(
    State(state): State<HttpState>,
    QueryParams(query): QueryParams<CareerQuery>,
) -> Listed<CareerRecord> {
    let window = query.page.window();
    let page = state.services.careers.list(window, &query.into_filter()).await?;
    Ok(Envelope::ok(messages::FETCHED, page.into()))
}

pub async fn get_career(State(state): State<HttpState>, Path(id): Path<String>) -> Item<CareerRecord> {
    let id = parse_id(&id, CareerRecord::SINGULAR)?;
    let career = state.services.careers.get_by_id(id).await?;
    Ok(Envelope::ok(messages::FETCHED, ItemPayload(career)))
}

pub async fn create_career(
    State(state): State<HttpState>,
    JsonBody(request): JsonBody<CareerCreateRequest>,
) -> Item<CareerRecord> {
    let command = CreateCareerCommand::try_from(request)?;
    let career = state.services.careers.create(command).await?;
    Ok(Envelope::created(messages::CREATED, ItemPayload(career)))
}

pub async fn update_career(
    State(state): State<HttpState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<CareerUpdateRequest>,
) -> Item<CareerRecord> {
    let id = parse_id(&id, CareerRecord::SINGULAR)?;
    let career = state.services.careers.update(id, request.into()).await?;
    Ok(Envelope::ok(messages::UPDATED, ItemPayload(career)))
}

pub async fn delete_career(
    State(state): State<HttpState>,
    Path(id): Path<String>,
) -> Result<Envelope<()>, ServiceError> {
    let id = parse_id(&id, CareerRecord::SINGULAR)?;
    state.services.careers.delete(id).await?;
    Ok(Envelope::message_only(StatusCode::OK, messages::DELETED))
}

pub async fn list_blogs(
    State(state): State<HttpState>,
    QueryParams(query): QueryParams<BlogQuery>,
) -> Listed<BlogRecord> {
    let window = query.page.window();
    let page = state.services.blogs.list(window, &query.into_filter()).await?;
    Ok(Envelope::ok(messages::FETCHED, page.into()))
}

pub async fn get_blog(State(state): State<HttpState>, Path(id): Path<String>) -> Item<BlogRecord> {
    let id = parse_id(&id, BlogRecord::SINGULAR)?;
    let blog = state.services.blogs.get_by_id(id).await?;
    Ok(Envelope::ok(messages::FETCHED, ItemPayload(blog)))
}

pub async fn create_blog(
    State(state): State<HttpState>,
    JsonBody(request): JsonBody<BlogCreateRequest>,
) -> Item<BlogRecord> {
    let command = CreateBlogCommand::try_from(request)?;
    let blog = state.services.blogs.create(command).await?;
    Ok(Envelope::created(messages::CREATED, ItemPayload(blog)))
}

pub async fn update_blog(
    State(state): State<HttpState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<BlogUpdateRequest>,
) -> Item<BlogRecord> {
    let id = parse_id(&id, BlogRecord::SINGULAR)?;
    let blog = state
        .services
        .blogs
        .update(id, UpdateBlogCommand::from(request))
        .await?;
    Ok(Envelope::ok(messages::UPDATED, ItemPayload(blog)))
}

pub async fn delete_blog(
    State(state): State<HttpState>,
    Path(id): Path<String>,
) -> Result<Envelope<()>, ServiceError> {
    let id = parse_id(&id, BlogRecord::SINGULAR)?;
    state.services.blogs.delete(id).await?;
    Ok(Envelope::message_only(StatusCode::OK, messages::DELETED))
}

pub async fn list_contacts(
    State(state): State<HttpState>,
    QueryParams(query): QueryParams<ContactQuery>,
) -> Listed<ContactRecord> {
    let window = query.page.window();
    let filter = query.into_filter()?;
    let page = state.services.contacts.list(window, &filter).await?;
    Ok(Envelope::ok(messages::FETCHED, page.into()))
}

pub async fn export_contacts(
    State(state): State<HttpState>,
    QueryParams(query): QueryParams<ContactQuery>,
) -> Exported<ContactRecord> {
    let rows = state.services.contacts.export(&query.into_filter()?).await?;
    Ok(Envelope::ok(messages::FETCHED, ExportPayload(rows)))
}

pub async fn list_franchise(
    State(state): State<HttpState>,
    QueryParams(query): QueryParams<FranchiseQuery>,
) -> Listed<FranchiseRecord> {
    let window = query.page.window();
    let filter = query.into_filter()?;
    let page = state.services.franchise.list(window, &filter).await?;
    Ok(Envelope::ok(messages::FETCHED, page.into()))
}

pub async fn export_franchise(
    State(state): State<HttpState>,
    QueryParams(query): QueryParams<FranchiseQuery>,
) -> Exported<FranchiseRecord> {
    let rows = state.services.franchise.export(&query.into_filter()?).await?;
    Ok(Envelope::ok(messages::FETCHED, ExportPayload(rows)))
}

pub async fn get_franchise(
    State(state): State<HttpState>,
    Path(id): Path<String>,
) -> Item<FranchiseRecord> {
    let id = parse_id(&id, FranchiseRecord::SINGULAR)?;
    let inquiry = state.services.franchise.get_by_id(id).await?;
    Ok(Envelope::ok(messages::FETCHED, ItemPayload(inquiry)))
}

pub async fn update_franchise_status(
    State(state): State<HttpState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<FranchiseStatusRequest>,
) -> Item<FranchiseRecord> {
    let id = parse_id(&id, FranchiseRecord::SINGULAR)?;
    let command = UpdateFranchiseStatusCommand::try_from(request)?;
    let inquiry = state.services.franchise.update_status(id, command).await?;
    Ok(Envelope::ok(messages::UPDATED, ItemPayload(inquiry)))
}

pub async fn list_payments(
    State(state): State<HttpState>,
    QueryParams(query): QueryParams<PaymentQuery>,
) -> Listed<PaymentRecord> {
    let window = query.page.window();
    let filter = query.into_filter()?;
    let page = state.services.payments.list(window, &filter).await?;
    Ok(Envelope::ok(messages::FETCHED, page.into()))
}

pub async fn export_payments(
    State(state): State<HttpState>,
    QueryParams(query): QueryParams<PaymentQuery>,
) -> Exported<PaymentRecord> {
    let rows = state.services.payments.export(&query.into_filter()?).await?;
    Ok(Envelope::ok(messages::FETCHED, ExportPayload(rows)))
}

pub async fn list_user_logins(
    State(state): State<HttpState>,
    QueryParams(query): QueryParams<UserLoginQuery>,
) -> Listed<UserLoginRecord> {
    let window = query.page.window();
    let filter = query.into_filter()?;
    let page = state.services.user_logins.list(window, &filter).await?;
    Ok(Envelope::ok(messages::FETCHED, page.into()))
}

pub async fn export_user_logins(
    State(state): State<HttpState>,
    QueryParams(query): QueryParams<UserLoginQuery>,
) -> Exported<UserLoginRecord> {
    let rows = state.services.user_logins.export(&query.into_filter()?).await?;
    Ok(Envelope::ok(messages::FETCHED, ExportPayload(rows)))
}

pub async fn list_users(
    State(state): State<HttpState>,
    QueryParams(query): QueryParams<UserQuery>,
) -> Listed<UserRecord> {
    let window = query.page.window();
    let filter = query.into_filter()?;
    let page = state.services.users.list(window, &filter).await?;
    Ok(Envelope::ok(messages::FETCHED, page.into()))
}

pub async fn list_subscriptions(
    State(state): State<HttpState>,
    QueryParams(query): QueryParams<SubscriptionQuery>,
) -> Listed<SubscriptionRecord> {
    let window = query.page.window();
    let filter = query.into_filter()?;
    let page = state.services.subscriptions.list(window, &filter).await?;
    Ok(Envelope::ok(messages::FETCHED, page.into()))
}

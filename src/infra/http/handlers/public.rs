//! Unauthenticated handlers: published content, the intake forms and the
//! website's checkout and lead records.

use axum::extract::{Path, State};

use crate::application::contacts::CreateContactCommand;
use crate::application::envelope::{Envelope, ItemPayload, ListPayload, messages};
use crate::application::error::ServiceError;
use crate::application::franchise::CreateFranchiseCommand;
use crate::application::resource::Resource;
use crate::application::subscriptions::CreateSubscriptionCommand;
use crate::application::user_details::CreateUserDetailsCommand;
use crate::domain::entities::{
    BlogRecord, CareerRecord, ContactRecord, FranchiseRecord, SubscriptionRecord,
    UserDetailsRecord,
};
use crate::domain::error::DomainError;

use crate::infra::http::error::{JsonBody, QueryParams};
use crate::infra::http::models::{
    BlogQuery, CareerQuery, ContactRequest, FranchiseRequest, SubscriptionRequest,
    UserDetailsRequest, parse_id,
};
use crate::infra::http::state::HttpState;

pub async fn public_blogs(
    State(state): State<HttpState>,
    QueryParams(query): QueryParams<BlogQuery>,
) -> Result<Envelope<ListPayload<BlogRecord>>, ServiceError> {
    let window = query.page.window();
    let page = state
        .services
        .blogs
        .list_published(window, &query.into_filter())
        .await?;
    Ok(Envelope::ok(messages::FETCHED, page.into()))
}

pub async fn public_blog(
    State(state): State<HttpState>,
    Path(id): Path<String>,
) -> Result<Envelope<ItemPayload<BlogRecord>>, ServiceError> {
    let id = parse_id(&id, BlogRecord::SINGULAR)?;
    let blog = state.services.blogs.get_published_by_id(id).await?;
    Ok(Envelope::ok(messages::FETCHED, ItemPayload(blog)))
}

pub async fn public_blog_by_slug(
    State(state): State<HttpState>,
    Path(slug): Path<String>,
) -> Result<Envelope<ItemPayload<BlogRecord>>, ServiceError> {
    let slug = slug.trim();
    if slug.is_empty() {
        return Err(DomainError::validation("Blog slug is required").into());
    }
    let blog = state.services.blogs.get_published_by_slug(slug).await?;
    Ok(Envelope::ok(messages::FETCHED, ItemPayload(blog)))
}

pub async fn public_careers(
    State(state): State<HttpState>,
    QueryParams(query): QueryParams<CareerQuery>,
) -> Result<Envelope<ListPayload<CareerRecord>>, ServiceError> {
    let window = query.page.window();
    let page = state
        .services
        .careers
        .list_active(window, &query.into_filter())
        .await?;
    Ok(Envelope::ok(messages::FETCHED, page.into()))
}

pub async fn public_career(
    State(state): State<HttpState>,
    Path(id): Path<String>,
) -> Result<Envelope<ItemPayload<CareerRecord>>, ServiceError> {
    let id = parse_id(&id, CareerRecord::SINGULAR)?;
    let career = state.services.careers.get_active_by_id(id).await?;
    Ok(Envelope::ok(messages::FETCHED, ItemPayload(career)))
}

pub async fn submit_contact(
    State(state): State<HttpState>,
    JsonBody(request): JsonBody<ContactRequest>,
) -> Result<Envelope<ItemPayload<ContactRecord>>, ServiceError> {
    let command = CreateContactCommand::try_from(request)?;
    let contact = state.services.contacts.create(command).await?;
    Ok(Envelope::created(messages::CONTACT_SUBMITTED, ItemPayload(contact)))
}

pub async fn submit_franchise(
    State(state): State<HttpState>,
    JsonBody(request): JsonBody<FranchiseRequest>,
) -> Result<Envelope<ItemPayload<FranchiseRecord>>, ServiceError> {
    let command = CreateFranchiseCommand::try_from(request)?;
    let inquiry = state.services.franchise.create(command).await?;
    Ok(Envelope::created(
        messages::FRANCHISE_SUBMITTED,
        ItemPayload(inquiry),
    ))
}

pub async fn submit_subscription(
    State(state): State<HttpState>,
    JsonBody(request): JsonBody<SubscriptionRequest>,
) -> Result<Envelope<ItemPayload<SubscriptionRecord>>, ServiceError> {
    let command = CreateSubscriptionCommand::try_from(request)?;
    let subscription = state.services.subscriptions.create(command).await?;
    Ok(Envelope::created(
        messages::SUBSCRIPTION_CREATED,
        ItemPayload(subscription),
    ))
}

pub async fn submit_user_details(
    State(state): State<HttpState>,
    JsonBody(request): JsonBody<UserDetailsRequest>,
) -> Result<Envelope<UserDetailsRecord>, ServiceError> {
    let command = CreateUserDetailsCommand::try_from(request)?;
    let details = state.services.user_details.create(command).await?;
    Ok(Envelope::created(messages::CREATED, details))
}

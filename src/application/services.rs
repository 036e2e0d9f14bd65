//! Wiring of every entity service over one repository backend.

use std::sync::Arc;

use crate::application::blogs::BlogService;
use crate::application::careers::CareerService;
use crate::application::contacts::ContactService;
use crate::application::franchise::FranchiseService;
use crate::application::payments::PaymentService;
use crate::application::repos::Repositories;
use crate::application::subscriptions::SubscriptionService;
use crate::application::user_details::UserDetailsService;
use crate::application::user_logins::UserLoginService;
use crate::application::users::UserService;
use crate::cache::CacheService;

#[derive(Clone)]
pub struct Services {
    pub careers: CareerService,
    pub blogs: BlogService,
    pub contacts: ContactService,
    pub franchise: FranchiseService,
    pub payments: PaymentService,
    pub user_logins: UserLoginService,
    pub users: UserService,
    pub subscriptions: SubscriptionService,
    pub user_details: UserDetailsService,
    pub cache: Arc<CacheService>,
}

impl Services {
    pub fn new<P: Repositories>(repos: Arc<P>, cache: Arc<CacheService>) -> Self {
        Self {
            careers: CareerService::new(
                repos.clone(),
                repos.clone(),
                repos.clone(),
                Arc::clone(&cache),
            ),
            blogs: BlogService::new(
                repos.clone(),
                repos.clone(),
                repos.clone(),
                Arc::clone(&cache),
            ),
            contacts: ContactService::new(repos.clone(), repos.clone(), Arc::clone(&cache)),
            franchise: FranchiseService::new(
                repos.clone(),
                repos.clone(),
                repos.clone(),
                Arc::clone(&cache),
            ),
            payments: PaymentService::new(repos.clone(), Arc::clone(&cache)),
            user_logins: UserLoginService::new(repos.clone(), Arc::clone(&cache)),
            users: UserService::new(repos.clone(), Arc::clone(&cache)),
            subscriptions: SubscriptionService::new(
                repos.clone(),
                repos.clone(),
                Arc::clone(&cache),
            ),
            user_details: UserDetailsService::new(repos),
            cache,
        }
    }
}

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::services::Services;
use crate::infra::db::PostgresRepositories;
use crate::infra::error::InfraError;

use super::auth::AdminToken;

/// Liveness check of the storage backend, reported by `/health`.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check(&self) -> Result<(), InfraError>;
}

#[async_trait]
impl HealthCheck for PostgresRepositories {
    async fn check(&self) -> Result<(), InfraError> {
        self.health_check().await.map_err(InfraError::from)
    }
}

#[derive(Clone)]
pub struct HttpState {
    pub services: Services,
    pub health: Arc<dyn HealthCheck>,
    pub admin: AdminToken,
}

impl HttpState {
    pub fn new(services: Services, health: Arc<dyn HealthCheck>, admin: AdminToken) -> Self {
        Self {
            services,
            health,
            admin,
        }
    }
}

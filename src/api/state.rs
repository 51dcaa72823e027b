//! Application state for shared services

use std::sync::Arc;

use crate::domain::image::AcceptedImage;
use crate::domain::user::{User, UserRepository, UserSummary};
use crate::domain::DomainError;
use crate::infrastructure::user::{
    CreateUserRequest, ImageService, PasswordHasher, UpdateUserRequest, UserService,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub image_service: Arc<dyn ImageServiceTrait>,
}

impl AppState {
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        image_service: Arc<dyn ImageServiceTrait>,
    ) -> Self {
        Self {
            user_service,
            image_service,
        }
    }
}

/// Trait for user lifecycle operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError>;
    async fn update(&self, request: UpdateUserRequest) -> Result<User, DomainError>;
    async fn delete(&self, email: Option<&str>) -> Result<User, DomainError>;
    async fn list(&self) -> Result<Vec<UserSummary>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

/// Trait for profile image operations
#[async_trait::async_trait]
pub trait ImageServiceTrait: Send + Sync {
    async fn associate_image(
        &self,
        email: Option<&str>,
        image: Option<AcceptedImage>,
    ) -> Result<String, DomainError>;
}

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        UserService::create(self, request).await
    }

    async fn update(&self, request: UpdateUserRequest) -> Result<User, DomainError> {
        UserService::update(self, request).await
    }

    async fn delete(&self, email: Option<&str>) -> Result<User, DomainError> {
        UserService::delete(self, email).await
    }

    async fn list(&self) -> Result<Vec<UserSummary>, DomainError> {
        UserService::list(self).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserService::count(self).await
    }
}

#[async_trait::async_trait]
impl<R: UserRepository + 'static> ImageServiceTrait for ImageService<R> {
    async fn associate_image(
        &self,
        email: Option<&str>,
        image: Option<AcceptedImage>,
    ) -> Result<String, DomainError> {
        ImageService::associate_image(self, email, image).await
    }
}

pub mod jwt;
pub mod password;

pub mod auth_models;
pub mod auth_dto;
pub mod auth_repository;
pub mod auth_handlers;
pub mod auth_service;

pub use jwt::{create_access_token, create_refresh_token, verify_jwt, Claims};
pub use password::{hash_password, verify_password};
pub use auth_repository::RefreshTokenRepository;
pub use auth_service::{AuthService, Identity};

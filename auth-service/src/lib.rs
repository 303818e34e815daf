pub mod config;
pub mod grpc;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use service_core::config::SettingsProvider;
use service_core::database::Repository;

use crate::models::User;
use crate::services::{AuthService, CredentialValidator, JwtService, UsersService};

/// Services shared by the RPC layer and any HTTP surface mounted on top.
#[derive(Clone)]
pub struct AppState {
    pub users: UsersService,
    pub auth: AuthService,
    pub validator: CredentialValidator,
}

impl AppState {
    pub fn new(users: Repository<User>, settings: Arc<dyn SettingsProvider>) -> Self {
        let jwt = JwtService::new(settings);

        Self {
            users: UsersService::new(users.clone()),
            auth: AuthService::new(jwt.clone()),
            validator: CredentialValidator::new(jwt, users),
        }
    }
}

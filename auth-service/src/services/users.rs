use mongodb::bson::{doc, Document};
use service_core::database::{Repository, RepositoryError};

use super::ServiceError;
use crate::models::{CreateUser, NewUser, User};
use crate::utils::{hash_password, verify_password, Password, PasswordHashString};

#[derive(Clone)]
pub struct UsersService {
    users: Repository<User>,
}

impl UsersService {
    pub fn new(users: Repository<User>) -> Self {
        Self { users }
    }

    /// Register a user. The email must not be taken; the password is stored hashed.
    pub async fn create(&self, input: CreateUser) -> Result<User, ServiceError> {
        match self.users.find_one(doc! { "email": input.email.as_str() }).await {
            Ok(_) => return Err(ServiceError::EmailAlreadyRegistered),
            Err(RepositoryError::NotFound) => {}
            Err(e) => return Err(e.into()),
        }

        let hash = hash_password(&Password::new(input.password))?;

        let user = self
            .users
            .create(&NewUser {
                email: &input.email,
                password: hash.as_str(),
            })
            .await?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Email/password check used at login.
    pub async fn validate_user(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        let user = match self.users.find_one(doc! { "email": email }).await {
            Ok(user) => user,
            Err(RepositoryError::NotFound) => return Err(ServiceError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        verify_password(
            &Password::new(password),
            &PasswordHashString::new(user.password.as_str()),
        )
        .map_err(|_| ServiceError::InvalidCredentials)?;

        Ok(user)
    }

    pub async fn get_user(&self, filter: Document) -> Result<User, ServiceError> {
        Ok(self.users.find_one(filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use service_core::database::{DocumentModel, InMemoryStore};
    use std::sync::Arc;

    fn service() -> (Arc<InMemoryStore>, UsersService) {
        let store = Arc::new(InMemoryStore::new(User::COLLECTION));
        let service = UsersService::new(Repository::new(store.clone()));
        (store, service)
    }

    fn input(email: &str) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            password: "Str0ngPassword!".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_stores_hash_not_password() {
        let (_, users) = service();

        let user = users.create(input("guest@example.com")).await.unwrap();

        assert_ne!(user.password, "Str0ngPassword!");
        assert!(user.password.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let (store, users) = service();
        users.create(input("guest@example.com")).await.unwrap();

        let result = users.create(input("guest@example.com")).await;

        assert!(matches!(result, Err(ServiceError::EmailAlreadyRegistered)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_on_email_check_propagates() {
        let (store, users) = service();
        store.set_unavailable(true);

        let result = users.create(input("guest@example.com")).await;

        assert!(matches!(
            result,
            Err(ServiceError::Repository(RepositoryError::Persistence(_)))
        ));
    }

    #[tokio::test]
    async fn test_validate_user() {
        let (_, users) = service();
        let created = users.create(input("guest@example.com")).await.unwrap();

        let user = users
            .validate_user("guest@example.com", "Str0ngPassword!")
            .await
            .unwrap();
        assert_eq!(user.id, created.id);

        assert!(matches!(
            users.validate_user("guest@example.com", "wrong").await,
            Err(ServiceError::InvalidCredentials)
        ));
        assert!(matches!(
            users.validate_user("nobody@example.com", "Str0ngPassword!").await,
            Err(ServiceError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_get_user_by_string_id() {
        let (_, users) = service();
        let created = users.create(input("guest@example.com")).await.unwrap();

        let found = users
            .get_user(doc! { "_id": created.id_string() })
            .await
            .unwrap();
        assert_eq!(found.email, "guest@example.com");

        assert!(matches!(
            users.get_user(doc! { "email": "nobody@example.com" }).await,
            Err(ServiceError::Repository(RepositoryError::NotFound))
        ));
    }
}

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{AuthService, TokenResponse};
use crate::entities::cash_register::{self, Entity as CashRegisterEntity};
use crate::entities::sale::{self, Entity as SaleEntity};
use crate::entities::user::{self, Entity as UserEntity, UserRole};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// Service for user accounts and login
#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
    auth: Arc<AuthService>,
    event_sender: EventSender,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(email(message = "Email must be valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(email(message = "Email must be valid"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8 to 128 characters"))]
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Email must be valid"))]
    pub email: Option<String>,
    #[validate(length(min = 8, max = 128, message = "Password must be 8 to 128 characters"))]
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub active: Option<bool>,
}

/// Account data safe to hand to clients
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role,
            active: model.active,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub token: TokenResponse,
    pub user: UserResponse,
}

impl UserService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        auth: Arc<AuthService>,
        event_sender: EventSender,
    ) -> Self {
        Self {
            db,
            auth,
            event_sender,
        }
    }

    /// Authenticates by email and password and issues a token.
    ///
    /// Every failure path collapses to the same InvalidCredentials answer
    /// so a caller cannot probe which emails exist. An account without a
    /// stored hash can never log in, no matter what password is sent.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<LoginResponse, ServiceError> {
        input.validate()?;

        let db = &*self.db;
        let email = input.email.trim().to_lowercase();

        let user = UserEntity::find()
            .filter(user::Column::Email.eq(email.clone()))
            .one(db)
            .await?;

        let Some(user) = user else {
            warn!("Login attempt for unknown email");
            return Err(ServiceError::AuthError("Invalid credentials".to_string()));
        };

        if !user.active {
            warn!(user_id = %user.id, "Login attempt for inactive account");
            return Err(ServiceError::AuthError("Invalid credentials".to_string()));
        }

        let Some(hash) = user.password_hash.as_deref() else {
            warn!(user_id = %user.id, "Login attempt for account without credentials");
            return Err(ServiceError::AuthError("Invalid credentials".to_string()));
        };

        let matches = self
            .auth
            .verify_password(&input.password, hash)
            .await
            .map_err(|e| ServiceError::HashError(e.to_string()))?;
        if !matches {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(ServiceError::AuthError("Invalid credentials".to_string()));
        }

        let token = self
            .auth
            .generate_token(&user)
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;

        info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(LoginResponse {
            token,
            user: user.into(),
        })
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: CreateUserInput) -> Result<UserResponse, ServiceError> {
        input.validate()?;

        let db = &*self.db;
        let email = input.email.trim().to_lowercase();

        let existing = UserEntity::find()
            .filter(user::Column::Email.eq(email.clone()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "A user with email {} already exists",
                email
            )));
        }

        let password_hash = self
            .auth
            .hash_password(&input.password)
            .await
            .map_err(|e| ServiceError::HashError(e.to_string()))?;

        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            email: Set(email),
            password_hash: Set(Some(password_hash)),
            role: Set(input.role),
            ..Default::default()
        };

        let created = model.insert(db).await.map_err(|e| {
            error!("Failed to create user: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        self.event_sender
            .send_or_log(Event::UserCreated(created.id))
            .await;

        info!(user_id = %created.id, role = %created.role, "User created");
        Ok(created.into())
    }

    /// Updates an account. Demoting or deactivating the last active admin
    /// is refused so the system can never lock every administrator out.
    #[instrument(skip(self, input))]
    pub async fn update_user(
        &self,
        id: Uuid,
        input: UpdateUserInput,
    ) -> Result<UserResponse, ServiceError> {
        input.validate()?;

        let db = &*self.db;

        let existing = UserEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", id)))?;

        let loses_admin = existing.role == UserRole::Admin
            && (matches!(input.role, Some(role) if role != UserRole::Admin)
                || input.active == Some(false));
        if loses_admin && self.count_other_active_admins(id).await? == 0 {
            return Err(ServiceError::Conflict(
                "At least one active admin account is required".to_string(),
            ));
        }

        if let Some(email) = &input.email {
            let email = email.trim().to_lowercase();
            let clash = UserEntity::find()
                .filter(user::Column::Email.eq(email))
                .filter(user::Column::Id.ne(id))
                .one(db)
                .await?;
            if clash.is_some() {
                return Err(ServiceError::Conflict(
                    "Another user already has that email".to_string(),
                ));
            }
        }

        let mut active_model = existing.into_active_model();
        if let Some(name) = input.name {
            active_model.name = Set(name);
        }
        if let Some(email) = input.email {
            active_model.email = Set(email.trim().to_lowercase());
        }
        if let Some(password) = input.password {
            let password_hash = self
                .auth
                .hash_password(&password)
                .await
                .map_err(|e| ServiceError::HashError(e.to_string()))?;
            active_model.password_hash = Set(Some(password_hash));
        }
        if let Some(role) = input.role {
            active_model.role = Set(role);
        }
        if let Some(active) = input.active {
            active_model.active = Set(active);
        }

        let updated = active_model.update(db).await?;

        info!(user_id = %updated.id, "User updated");
        Ok(updated.into())
    }

    /// Removes an account. Self-deletion is refused, as is removing the
    /// last active admin. Accounts with sales or register history are
    /// deactivated instead of deleted so those records keep their author.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: Uuid, acting_user_id: Uuid) -> Result<(), ServiceError> {
        if id == acting_user_id {
            return Err(ServiceError::InvalidOperation(
                "You cannot delete your own account".to_string(),
            ));
        }

        let db = &*self.db;

        let existing = UserEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", id)))?;

        if existing.role == UserRole::Admin
            && existing.active
            && self.count_other_active_admins(id).await? == 0
        {
            return Err(ServiceError::Conflict(
                "At least one active admin account is required".to_string(),
            ));
        }

        let has_sales = SaleEntity::find()
            .filter(sale::Column::CashierId.eq(id))
            .count(db)
            .await?
            > 0;
        let has_registers = CashRegisterEntity::find()
            .filter(cash_register::Column::OpenedBy.eq(id))
            .count(db)
            .await?
            > 0;

        if has_sales || has_registers {
            let mut active_model = existing.into_active_model();
            active_model.active = Set(false);
            active_model.update(db).await?;
            info!(user_id = %id, "User has history; deactivated instead of deleted");
        } else {
            UserEntity::delete_by_id(id).exec(db).await?;
            info!(user_id = %id, "User deleted");
        }

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> Result<UserResponse, ServiceError> {
        let db = &*self.db;

        UserEntity::find_by_id(id)
            .one(db)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_users(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<UserResponse>, u64), ServiceError> {
        let db = &*self.db;

        let paginator = UserEntity::find()
            .order_by_asc(user::Column::Name)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!("Failed to count users: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        let users = paginator
            .fetch_page(page.saturating_sub(1))
            .await?
            .into_iter()
            .map(UserResponse::from)
            .collect();

        Ok((users, total))
    }

    async fn count_other_active_admins(&self, excluding: Uuid) -> Result<u64, ServiceError> {
        let count = UserEntity::find()
            .filter(user::Column::Role.eq(UserRole::Admin))
            .filter(user::Column::Active.eq(true))
            .filter(user::Column::Id.ne(excluding))
            .count(&*self.db)
            .await?;
        Ok(count)
    }
}

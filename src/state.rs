use dashmap::DashMap;
use jsonwebtoken::{DecodingKey, EncodingKey};
use uuid::Uuid;

use crate::auth;
use crate::config::Config;
use crate::email::Mailer;
use crate::error::AppError;
use crate::ledger::Ledger;
use crate::models::audit::{ContactMessage, StaffRemoval};
use crate::models::user::{Role, User};
use crate::observability::metrics::Metrics;

pub struct AppState {
    pub users: DashMap<Uuid, User>,
    pub contacts: DashMap<Uuid, ContactMessage>,
    pub staff_removals: DashMap<Uuid, StaffRemoval>,
    pub ledger: Ledger,
    pub metrics: Metrics,
    pub mailer: Mailer,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_hours: i64,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            users: DashMap::new(),
            contacts: DashMap::new(),
            staff_removals: DashMap::new(),
            ledger: Ledger::new(),
            metrics: Metrics::new(),
            mailer: Mailer::new(),
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_ttl_hours: config.token_ttl_hours,
        }
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AppError> {
        auth::issue_token(user.id, user.role, self.token_ttl_hours, &self.encoding_key)
    }

    pub fn user_by_id(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).map(|entry| entry.value().clone())
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.users
            .iter()
            .find(|entry| entry.value().email == email)
            .map(|entry| entry.value().clone())
    }

    pub fn staff_by_id(&self, id: Uuid) -> Option<User> {
        self.user_by_id(id).filter(|user| user.role == Role::Staff)
    }

    pub fn staff_by_name(&self, name: &str) -> Option<User> {
        self.users
            .iter()
            .find(|entry| entry.value().role == Role::Staff && entry.value().name == name)
            .map(|entry| entry.value().clone())
    }

    pub fn users_with_role(&self, role: Role) -> Vec<User> {
        self.users
            .iter()
            .filter(|entry| entry.value().role == role)
            .map(|entry| entry.value().clone())
            .collect()
    }
}

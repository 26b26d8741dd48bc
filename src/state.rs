use crate::{
    analytics::AnalyticsService,
    announcement::{AnnouncementRepository, AnnouncementService},
    assignment::{AssignmentRepository, AssignmentService},
    attendance::{AttendanceRepository, AttendanceService},
    auth::{AuthService, RefreshTokenRepository},
    chat::{AssistantClient, ChatRepository, ChatService},
    db::DbPool,
    document::{DocumentRepository, DocumentService},
    enrollment::{EnrollmentRepository, EnrollmentService},
    message::{Message, MessageRepository, MessageService},
    program::{ProgramRepository, ProgramService},
    user::{UserRepository, UserService},
};
use anyhow::{anyhow, Context};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// New direct messages, keyed by receiver, for the SSE stream.
    pub message_tx: broadcast::Sender<(Uuid, Message)>,
    pub user_service: UserService,
    pub auth_service: AuthService,
    pub program_service: ProgramService,
    pub enrollment_service: EnrollmentService,
    pub assignment_service: AssignmentService,
    pub attendance_service: AttendanceService,
    pub announcement_service: AnnouncementService,
    pub message_service: MessageService,
    pub chat_service: ChatService,
    pub document_service: DocumentService,
    pub analytics_service: AnalyticsService,
}

impl AppState {
    pub fn new(db: DbPool, config: Arc<Config>) -> Self {
        let (message_tx, _) = broadcast::channel(100);

        let user_repository = UserRepository::new(db.clone());
        let program_repository = ProgramRepository::new(db.clone());
        let enrollment_repository = EnrollmentRepository::new(db.clone());
        let assignment_repository = AssignmentRepository::new(db.clone());
        let attendance_repository = AttendanceRepository::new(db.clone());
        let announcement_repository = AnnouncementRepository::new(db.clone());
        let message_repository = MessageRepository::new(db.clone());
        let chat_repository = ChatRepository::new(db.clone());
        let document_repository = DocumentRepository::new(db.clone());
        let refresh_token_repository = RefreshTokenRepository::new(db.clone());

        let user_service = UserService::new(
            db.clone(),
            user_repository.clone(),
            enrollment_repository.clone(),
            document_repository.clone(),
        );
        let auth_service = AuthService::new(
            db.clone(),
            user_repository.clone(),
            refresh_token_repository,
            config.jwt_secret.clone(),
            config.auth_mode,
        );
        let program_service = ProgramService::new(program_repository.clone());
        let enrollment_service = EnrollmentService::new(
            db.clone(),
            enrollment_repository.clone(),
            program_repository.clone(),
        );
        let assignment_service = AssignmentService::new(
            assignment_repository,
            program_repository.clone(),
            enrollment_repository.clone(),
        );
        let attendance_service = AttendanceService::new(
            attendance_repository,
            enrollment_repository.clone(),
        );
        let announcement_service = AnnouncementService::new(
            announcement_repository,
            program_repository,
            enrollment_repository,
        );
        let message_service = MessageService::new(db.clone(), message_repository, user_repository);
        let assistant = AssistantClient::new(
            config.openrouter_api_key.clone(),
            config.openrouter_base_url.clone(),
            config.openrouter_model.clone(),
        );
        let chat_service = ChatService::new(chat_repository, assistant);
        let document_service =
            DocumentService::new(document_repository, config.document_base_url.clone());
        let analytics_service = AnalyticsService::new(db);

        Self {
            config,
            message_tx,
            user_service,
            auth_service,
            program_service,
            enrollment_service,
            assignment_service,
            attendance_service,
            announcement_service,
            message_service,
            chat_service,
            document_service,
            analytics_service,
        }
    }
}

/// How login requests are authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Email lookup plus bcrypt verification.
    Credentials,
    /// Every login succeeds as the built-in administrator.
    Bypass,
}

impl std::str::FromStr for AuthMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "credentials" => Ok(AuthMode::Credentials),
            "bypass" => Ok(AuthMode::Bypass),
            other => Err(anyhow!("unknown AUTH_MODE '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub auth_mode: AuthMode,
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub openrouter_model: String,
    pub document_base_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| anyhow!("{} must be set", key));
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: or_default("DATABASE_MAX_CONNECTIONS", "5")
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a number")?,
            host: or_default("HOST", "127.0.0.1"),
            port: or_default("PORT", "3000")
                .parse()
                .context("PORT must be a number")?,
            jwt_secret: required("JWT_SECRET")?,
            auth_mode: or_default("AUTH_MODE", "credentials").parse()?,
            openrouter_api_key: lookup("OPENROUTER_API_KEY").filter(|key| !key.trim().is_empty()),
            openrouter_base_url: or_default("OPENROUTER_BASE_URL", "https://openrouter.ai/api/v1"),
            openrouter_model: or_default("OPENROUTER_MODEL", "openai/gpt-3.5-turbo"),
            document_base_url: or_default("DOCUMENT_BASE_URL", "https://example.com/files"),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/edubridge"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.auth_mode, AuthMode::Credentials);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.database_max_connections, 5);
        assert!(config.openrouter_api_key.is_none());
        assert_eq!(config.openrouter_model, "openai/gpt-3.5-turbo");
    }

    #[test]
    fn test_config_requires_jwt_secret() {
        let err = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/x")]))
            .unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_config_auth_mode_bypass() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/edubridge"),
            ("JWT_SECRET", "secret"),
            ("AUTH_MODE", "Bypass"),
            ("OPENROUTER_API_KEY", "  "),
        ]))
        .unwrap();

        assert_eq!(config.auth_mode, AuthMode::Bypass);
        assert!(config.openrouter_api_key.is_none());
    }

    #[test]
    fn test_config_rejects_unknown_auth_mode() {
        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/edubridge"),
            ("JWT_SECRET", "secret"),
            ("AUTH_MODE", "magic"),
        ]));
        assert!(result.is_err());
    }
}

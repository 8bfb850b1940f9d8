//! Application state
//!
//! Every collaborator is built once here and injected into the services
//! as a narrow trait object.

use crate::assistant::{AssistantGateway, OpenAiGateway};
use crate::auth::JwtVerifier;
use crate::chat::{ChatCoordinator, QuotaJobs};
use crate::config::Config;
use crate::services::{ChatBotService, FileService, IdentityService, UserService};
use crate::sso::{IdentityProvider, SsoClient};
use crate::store::Database;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::info;

/// Shared state behind every handler
pub struct AppState {
    /// Loaded configuration
    pub config: Config,
    /// Chat turns and remote chat-bot teardown
    pub coordinator: Arc<ChatCoordinator>,
    /// Chat-bot use cases
    pub chat_bots: ChatBotService,
    /// File use cases
    pub files: FileService,
    /// User use cases
    pub users: UserService,
    /// SSO use cases
    pub identity: IdentityService,
    /// Token verifier used by the auth middleware
    pub verifier: Arc<JwtVerifier>,
    quota_worker: Mutex<Option<JoinHandle<()>>>,
}

impl AppState {
    /// Wire services around the given collaborators
    ///
    /// Spawns the quota worker, so it must run inside a Tokio runtime.
    pub fn new(
        config: Config,
        db: Database,
        gateway: Arc<dyn AssistantGateway>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let db = Arc::new(db);
        let (quota, worker) = QuotaJobs::spawn(db.clone());
        let coordinator = Arc::new(ChatCoordinator::new(db.clone(), gateway.clone(), quota));

        Self {
            chat_bots: ChatBotService::new(db.clone(), gateway.clone(), coordinator.clone()),
            files: FileService::new(db.clone(), db.clone(), gateway),
            users: UserService::new(db),
            identity: IdentityService::new(identity, config.sso.app_id),
            verifier: Arc::new(JwtVerifier::new(&config.auth.jwt_secret)),
            coordinator,
            config,
            quota_worker: Mutex::new(Some(worker)),
        }
    }

    /// Hand out the quota worker handle once, for draining at shutdown
    pub fn take_quota_worker(&self) -> Option<JoinHandle<()>> {
        self.quota_worker.lock().ok().and_then(|mut worker| worker.take())
    }

    /// Open the database and build the HTTP clients from configuration
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let db = Database::new(&config.database.path).await?;
        let gateway = Arc::new(OpenAiGateway::new(&config.assistant)?);
        let identity = Arc::new(SsoClient::new(&config.sso)?);
        info!(
            database = %config.database.path,
            assistant_url = %config.assistant.base_url,
            sso_url = %config.sso.base_url,
            "Application state initialized"
        );
        Ok(Self::new(config, db, gateway, identity))
    }
}

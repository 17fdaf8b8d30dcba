//! Startup shared by the `gmail-digest` and `gmail-digest-cron` binaries

use anyhow::{Context, Result};
use log::{error, info, warn};
use mail::{
    DigestConfig, DigestPipeline, FileTokenStore, GmailAuth, GmailClient, GmailCredentials,
    OpenAiClient, RunOutcome,
};

/// Initialize logging and the config directory, then load the configuration
pub fn bootstrap() -> Result<DigestConfig> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Bootstrap config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    DigestConfig::from_env()
}

/// The long-lived clients a digest run needs
pub struct Services {
    pub gmail: GmailClient,
    pub completion: OpenAiClient,
}

impl Services {
    /// Load Gmail credentials and build the Gmail and completion clients
    ///
    /// Without `interactive`, a missing or revoked token is an error instead
    /// of a browser sign-in.
    pub fn connect(config: &DigestConfig, interactive: bool) -> Result<Self> {
        let creds = match GmailCredentials::load(&config.credentials_path) {
            Ok(creds) => creds,
            Err(e) => {
                warn!("Gmail credentials not found: {}", e);
                warn!(
                    "To configure Gmail access, either:\n\
                     1. Place your Google OAuth credentials at: {}\n\
                     2. Or set environment variables: GMAIL_CLIENT_ID and GMAIL_CLIENT_SECRET",
                    config.credentials_path.display()
                );
                return Err(e);
            }
        };

        let mut auth = GmailAuth::new(creds, FileTokenStore::new(&config.token_path));
        if !interactive {
            auth = auth.non_interactive();
        }
        let gmail = GmailClient::new(auth);
        gmail.authenticate().context("Gmail authentication failed")?;
        info!("Gmail client initialized successfully");

        let completion = OpenAiClient::new(&config.openai_api_key)
            .with_model(&config.openai_model)
            .with_base_url(&config.openai_base_url);

        Ok(Self { gmail, completion })
    }

    /// Run the digest once
    pub fn run(&self, config: &DigestConfig, dry_run: bool) -> Result<RunOutcome> {
        DigestPipeline::new(&self.gmail, &self.completion, config).run(dry_run)
    }
}

/// Log how a run ended
pub fn report(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Sent { message_id } => info!("Digest sent (id {})", message_id),
        RunOutcome::DryRun(email) => {
            info!("Dry run complete: {:?} for {}", email.subject, email.to);
            println!("{}", email.html);
        }
        RunOutcome::NothingToSend => info!("Nothing to send"),
    }
}

//! Command handlers for the gatepass CLI.
//!
//! Each handler does what one screen of the mobile client did: validate the
//! form input, call a single capability, and turn a failure into a message.
//! A token the server rejects with 401 is dropped so the next command asks
//! for a fresh login.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, error, info, warn};

use gatepass_core::auth::validate;
use gatepass_core::config::TokenBackend;
use gatepass_core::models::TicketFilter;
use gatepass_core::{
    ApiClient, ApiError, Capability, Config, ErrorKind, FileTokenStore, Session, TokenStore,
};

use crate::render;

/// Environment variable for non-interactive login
const PASSWORD_ENV: &str = "GATEPASS_PASSWORD";

pub struct App {
    config: Config,
    api: ApiClient,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let store = config.token_store().context("Failed to open token store")?;
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Arc<dyn TokenStore>) -> Result<Self> {
        let api = ApiClient::from_config(&config, store).context("Failed to create API client")?;
        debug!(base_url = api.base_url(), backend = ?config.token_backend, "App configured");

        Ok(Self { config, api })
    }

    fn session(&self) -> Session<'_> {
        Session::new(self.api.store().as_ref())
    }

    /// Stop early when no token is stored, before any request goes out
    async fn require_session(&self) -> Result<()> {
        if !self.session().is_active().await? {
            bail!("Not logged in. Run `gatepass login` first.");
        }
        Ok(())
    }

    /// Turn a failed call into the error shown to the user
    async fn fail(&self, capability: Capability, err: ApiError) -> anyhow::Error {
        error!(capability = %capability, error = %err, "Request failed");

        if capability != Capability::Authenticate {
            match self.session().handle_rejection(&err).await {
                Ok(true) => return anyhow!(ErrorKind::SessionExpired.user_message()),
                Ok(false) => {}
                Err(e) => warn!(error = %e, "Failed to clear rejected token"),
            }
        }
        anyhow!(ErrorKind::describe(capability, &err))
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub async fn login(&mut self, username: Option<String>) -> Result<()> {
        let username = match username.or_else(|| self.config.last_username.clone()) {
            Some(u) => u,
            None => prompt("Username: ")?,
        };
        let password = match std::env::var(PASSWORD_ENV) {
            Ok(p) if !p.is_empty() => p,
            _ => rpassword::prompt_password("Password: ")?,
        };
        let name = self.sign_in(&username, &password).await?;

        self.config.last_username = Some(username);
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
        println!("Logged in as {}", name);
        Ok(())
    }

    /// Authenticate and return the name to greet the user with
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<String> {
        validate::require("Username", username)?;
        validate::require("Password", password)?;

        let session = match self.api.authenticate(username, password).await {
            Ok(session) => session,
            Err(e) => return Err(self.fail(Capability::Authenticate, e).await),
        };

        let name = session
            .field("customerName")
            .or_else(|| session.field("username"))
            .unwrap_or(username);
        Ok(name.to_string())
    }

    pub async fn logout(&self) -> Result<()> {
        self.session().logout().await?;
        println!("Logged out");
        Ok(())
    }

    pub async fn status(&self) -> Result<()> {
        println!("Server:  {}", self.api.base_url());
        println!("Storage: {:?}", self.config.token_backend);

        if !self.session().is_active().await? {
            println!("Session: not logged in");
            return Ok(());
        }

        let saved_at = match self.config.token_backend {
            TokenBackend::File => FileTokenStore::new(self.config.cache_dir()?)
                .load()
                .await?
                .map(|data| data.saved_at),
            TokenBackend::Keyring => None,
        };
        match saved_at {
            Some(at) => println!(
                "Session: logged in since {}",
                at.with_timezone(&chrono::Local).format("%d/%m/%Y %H:%M")
            ),
            None => println!("Session: logged in"),
        }
        Ok(())
    }

    pub async fn change_password(&self) -> Result<()> {
        self.require_session().await?;

        let old_password = rpassword::prompt_password("Old password: ")?;
        let new_password = rpassword::prompt_password("New password: ")?;
        validate::require("Old password", &old_password)?;
        validate::new_password(&new_password)?;

        match self.api.change_password(&old_password, &new_password).await {
            Ok(_) => {
                info!("Password changed");
                println!("Password changed successfully.");
                Ok(())
            }
            Err(e) => Err(self.fail(Capability::ChangePassword, e).await),
        }
    }

    pub async fn forgot_password(&self, identifier: &str) -> Result<()> {
        validate::require("Email or username", identifier)?;

        match self.api.request_recovery(identifier).await {
            Ok(ack) => {
                println!("{}", ack.message_or("A verification code was sent to your email."));
                println!("Next: gatepass verify-otp {} <code>", identifier);
                Ok(())
            }
            Err(e) => Err(self.fail(Capability::RequestRecovery, e).await),
        }
    }

    pub async fn verify_otp(&self, identifier: &str, otp: &str) -> Result<()> {
        validate::require("Email or username", identifier)?;
        validate::otp(otp)?;

        match self.api.verify_recovery_code(identifier, otp).await {
            Ok(ack) => {
                println!("{}", ack.message_or("Verification code accepted."));
                println!("Next: gatepass reset-password {}", identifier);
                Ok(())
            }
            Err(e) => Err(self.fail(Capability::VerifyRecoveryCode, e).await),
        }
    }

    pub async fn reset_password(&self, identifier: &str) -> Result<()> {
        validate::require("Email or username", identifier)?;
        let new_password = rpassword::prompt_password("New password: ")?;
        validate::require("New password", &new_password)?;

        match self.api.complete_recovery(identifier, &new_password).await {
            Ok(ack) => {
                println!("{}", ack.message_or("Password reset successfully."));
                println!("You can now run `gatepass login`.");
                Ok(())
            }
            Err(e) => Err(self.fail(Capability::CompleteRecovery, e).await),
        }
    }

    // =========================================================================
    // Profile
    // =========================================================================

    pub async fn profile(&self) -> Result<()> {
        self.require_session().await?;
        match self.api.fetch_profile().await {
            Ok(profile) => {
                render::print_profile(&profile);
                Ok(())
            }
            Err(e) => Err(self.fail(Capability::FetchProfile, e).await),
        }
    }

    pub async fn update_profile(
        &self,
        name: Option<String>,
        phone: Option<String>,
        age: Option<u32>,
    ) -> Result<()> {
        self.require_session().await?;

        // Unspecified fields keep their current values
        let current = match self.api.fetch_profile().await {
            Ok(profile) => profile,
            Err(e) => return Err(self.fail(Capability::FetchProfile, e).await),
        };
        let name = name.or_else(|| current.customer_name.clone()).unwrap_or_default();
        let phone = phone.or_else(|| current.phone_number.clone()).unwrap_or_default();
        validate::require("Name", &name)?;

        match self
            .api
            .update_profile(&name, &phone, age.or(current.age))
            .await
        {
            Ok(updated) => {
                println!("Profile updated.");
                render::print_profile(&current.merged_with(updated));
                Ok(())
            }
            Err(e) => Err(self.fail(Capability::UpdateProfile, e).await),
        }
    }

    // =========================================================================
    // Tickets and check-ins
    // =========================================================================

    pub async fn tickets(&self, filter: TicketFilter, show_qr: bool) -> Result<()> {
        self.require_session().await?;
        match self.api.fetch_tickets().await {
            Ok(tickets) => {
                render::print_tickets(&filter.apply(&tickets), show_qr);
                Ok(())
            }
            Err(e) => Err(self.fail(Capability::FetchTickets, e).await),
        }
    }

    pub async fn check_ins(&self, query: &str) -> Result<()> {
        self.require_session().await?;
        match self.api.fetch_check_in_logs().await {
            Ok(logs) => {
                let shown: Vec<_> = logs.iter().filter(|log| log.matches(query)).collect();
                render::print_check_in_logs(&shown);
                Ok(())
            }
            Err(e) => Err(self.fail(Capability::FetchCheckInLogs, e).await),
        }
    }

    /// Overview of tickets and check-ins, fetched concurrently
    pub async fn home(&self) -> Result<()> {
        self.require_session().await?;

        let tickets = async {
            self.api
                .fetch_tickets()
                .await
                .map_err(|e| (Capability::FetchTickets, e))
        };
        let logs = async {
            self.api
                .fetch_check_in_logs()
                .await
                .map_err(|e| (Capability::FetchCheckInLogs, e))
        };

        match futures::try_join!(tickets, logs) {
            Ok((tickets, logs)) => {
                render::print_home(&tickets, &logs);
                Ok(())
            }
            Err((capability, e)) => Err(self.fail(capability, e).await),
        }
    }
}

fn prompt(label: &str) -> Result<String> {
    use std::io::{self, Write};

    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

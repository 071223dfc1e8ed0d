//! Command handlers for the CLI.
//!
//! `App` wires the configuration, session store, transport, and gateway
//! client together once, then runs one command against them.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use vault_core::api::{ApiClient, ReqwestTransport, Transport};
use vault_core::auth::{Credentials, FileStore, RegistrationRequest, SessionManager};
use vault_core::models::{FileId, SearchParams, UploadFile, UploadSummary};
use vault_core::Config;

use crate::output;

pub struct App {
    config: Config,
    client: ApiClient,
}

impl App {
    pub fn new(server_override: Option<String>) -> Result<Self> {
        let mut config = Config::load().context("Failed to load configuration")?;
        if let Some(server) = server_override {
            config.base_url = server;
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let transport: Arc<dyn Transport> =
            Arc::new(ReqwestTransport::with_client(builder.build()?));

        let store = Arc::new(FileStore::new(config.session_dir()?));
        let session = Arc::new(SessionManager::new(&config.base_url, transport.clone(), store)?);
        let client = ApiClient::new(&config.base_url, transport, session)?;
        debug!(base_url = %config.base_url, "Client ready");

        Ok(Self { config, client })
    }

    fn session(&self) -> &SessionManager {
        self.client.session()
    }

    fn require_login(&self) -> Result<()> {
        if self.session().is_authenticated() {
            Ok(())
        } else {
            Err(anyhow::anyhow!("Not logged in. Run `vault login` first."))
        }
    }

    fn page_size(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.config.page_size)
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub async fn login(&mut self, username: Option<String>) -> Result<()> {
        let username = match username {
            Some(name) => name,
            None => prompt_username(self.config.last_username.as_deref())?,
        };
        if username.is_empty() {
            return Err(anyhow::anyhow!("Username is required"));
        }
        let password = rpassword::prompt_password("Password: ")?;

        let session = self
            .session()
            .login(&Credentials::new(username.clone(), password))
            .await?;
        self.session()
            .set_auth(&session)
            .context("Failed to store session")?;

        self.config.last_username = Some(username);
        if let Err(e) = self.config.save() {
            tracing::warn!(error = %e, "Failed to save config");
        }

        println!("Welcome back, {}!", session.username);
        Ok(())
    }

    pub async fn register(&self, username: String) -> Result<()> {
        let password = rpassword::prompt_password("Password: ")?;
        let confirm = rpassword::prompt_password("Confirm password: ")?;
        if password != confirm {
            return Err(anyhow::anyhow!("Passwords do not match"));
        }

        self.session()
            .register(&RegistrationRequest::new(username, password))
            .await
            .context("Registration failed. Username may already be taken.")?;

        println!("Account created. You can now run `vault login`.");
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        self.session().logout().context("Failed to clear session")?;
        println!("Logged out.");
        Ok(())
    }

    pub fn whoami(&self) -> Result<()> {
        match self.session().get_username() {
            Some(name) if self.session().is_authenticated() => println!("{}", name),
            _ => println!("Not logged in."),
        }
        Ok(())
    }

    // =========================================================================
    // Files
    // =========================================================================

    pub async fn list(&self, page: u32, page_size: Option<u32>) -> Result<()> {
        self.require_login()?;
        let listing = self
            .client
            .get_files(page, self.page_size(page_size))
            .await
            .context("Failed to load files")?;
        print!("{}", output::file_table(&listing));
        Ok(())
    }

    pub async fn list_public(&self, page: u32, page_size: Option<u32>) -> Result<()> {
        let listing = self
            .client
            .get_public_files(page, self.page_size(page_size))
            .await
            .context("Failed to load public files")?;
        print!("{}", output::file_table(&listing));
        Ok(())
    }

    pub async fn search(&self, mut params: SearchParams) -> Result<()> {
        self.require_login()?;
        if params.page_size.is_none() {
            params.page_size = Some(self.config.page_size);
        }
        let listing = self
            .client
            .search_files(&params)
            .await
            .context("Search failed")?;
        print!("{}", output::file_table(&listing));
        Ok(())
    }

    pub async fn stats(&self) -> Result<()> {
        self.require_login()?;
        let stats = self
            .client
            .get_stats()
            .await
            .context("Failed to load storage statistics")?;
        print!("{}", output::stats_report(&stats));
        Ok(())
    }

    pub async fn upload(&self, paths: Vec<PathBuf>, tags: Option<String>) -> Result<()> {
        self.require_login()?;
        let mut files = Vec::with_capacity(paths.len());
        for path in &paths {
            let file = UploadFile::from_path(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            files.push(file);
        }

        let results = self
            .client
            .upload_files(files, tags.as_deref())
            .await
            .context("Upload failed")?;

        print!("{}", output::upload_report(&results));
        println!("{}", UploadSummary::from_results(&results).display());
        Ok(())
    }

    pub async fn delete(&self, id: FileId) -> Result<()> {
        self.require_login()?;
        let result = self
            .client
            .delete_file(id)
            .await
            .context("Failed to delete the file")?;
        println!("{}", result.outcome_display());
        Ok(())
    }

    pub async fn publish(&self, id: FileId) -> Result<()> {
        self.require_login()?;
        let result = self
            .client
            .make_file_public(id)
            .await
            .context("Failed to update file visibility")?;
        if result.is_public {
            println!("File is now public");
        } else {
            println!("{}", result.message);
        }
        Ok(())
    }

    pub fn download_url(&self, id: FileId) -> Result<()> {
        self.require_login()?;
        println!("{}", self.client.get_download_url(id));
        Ok(())
    }

    pub fn preview_url(&self, id: FileId) -> Result<()> {
        self.require_login()?;
        println!("{}", self.client.get_preview_url(id));
        Ok(())
    }
}

fn prompt_username(last_username: Option<&str>) -> Result<String> {
    match last_username {
        Some(last) => print!("Username [{}]: ", last),
        None => print!("Username: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match (input.is_empty(), last_username) {
        (true, Some(last)) => last.to_string(),
        _ => input.to_string(),
    })
}

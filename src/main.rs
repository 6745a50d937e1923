//! schoolsite - renders the admin dashboard against the configured backend

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use schoolsite::{
    admin::{AdminDashboard, AdminPage, PageLayout},
    backend::Backend,
    config::Config,
    render::Renderer,
    services::{AuthService, LogPrompt},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "schoolsite=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting schoolsite...");

    let config = Config::load_with_env(Path::new("schoolsite.yml"))?;
    tracing::info!("Configuration loaded, backend at {}", config.backend.url);

    let backend = Backend::supabase(&config.backend)?;
    let prompt = Arc::new(LogPrompt::default());

    if let (Ok(email), Ok(password)) = (
        std::env::var("SCHOOLSITE_ADMIN_EMAIL"),
        std::env::var("SCHOOLSITE_ADMIN_PASSWORD"),
    ) {
        let auth = AuthService::new(&backend, &config.site, prompt.clone());
        if let Err(e) = auth.login(&email, &password).await {
            tracing::error!("Sign-in failed: {}", e);
        }
    }

    let renderer = Renderer::new()?;
    match AdminDashboard::open(&backend, &config, PageLayout::full(), prompt).await {
        AdminPage::Redirect(target) => {
            tracing::info!("Not signed in");
            println!("Redirect: {}", target);
        }
        AdminPage::Dashboard(dashboard) => {
            println!("{}", renderer.render_dashboard(&dashboard.snapshot())?);
        }
    }

    Ok(())
}

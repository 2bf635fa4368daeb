//! # Aethelgard API
//!
//! The entry point: loads configuration, wires the adapters into the
//! services, seeds the data documents, and serves the axum router.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use secrecy::ExposeSecret;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api_adapters::metrics::Metrics;
use api_adapters::{build_router, AppState, RouterOptions};
use auth_adapters::{Argon2Hasher, JwtTokenService};
use configs::AppConfig;
use domains::ports::{CharacterReader, GameAccountRepo, TokenService, UserStore};
use services::{
    AdminGate, AdminRoster, AuthService, EventsService, FixedWindowLimiter, ForumService,
    ProfileService, RankingService,
};
use storage_adapters::gamedb::GameDbOptions;
use storage_adapters::{FileEventStore, FileForumStore, FileUserStore, GameDb, LocalPortraits};

fn init_tracing(production: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if production {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AppConfig::load().context("loading configuration")?;
    init_tracing(cfg.server.is_production());

    if cfg.auth.uses_dev_secret() {
        warn!("AUTH__JWT_SECRET is the development default; do not run this in production");
    }

    // Data bootstrap: documents self-heal on first read, the uploads tree
    // must exist for static serving.
    tokio::fs::create_dir_all(cfg.data.characters_dir())
        .await
        .context("creating the uploads directory")?;

    let users: Arc<dyn UserStore> = Arc::new(FileUserStore::new(cfg.data.users_file()));
    let forum_store = Arc::new(FileForumStore::new(cfg.data.forum_file()));
    let events_store = Arc::new(FileEventStore::new(cfg.data.events_file()));

    let gamedb = Arc::new(
        GameDb::connect(GameDbOptions {
            auth_url: cfg.game_db.auth_url(),
            characters_url: cfg.game_db.characters_url(),
            max_connections: cfg.game_db.max_connections,
            query_timeout: cfg.game_db.query_timeout(),
        })
        .await
        .context("connecting to the game database")?,
    );
    let accounts: Arc<dyn GameAccountRepo> = gamedb.clone();
    let characters: Arc<dyn CharacterReader> = gamedb;

    let portraits = Arc::new(LocalPortraits::new(
        cfg.data.characters_dir(),
        "/api/uploads/characters",
    ));
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(
        cfg.auth.jwt_secret.expose_secret().as_bytes(),
    ));
    let roster = AdminRoster::from_csv(&cfg.auth.admin_emails);
    let gate = AdminGate::new(roster.clone(), users.clone());

    let forum = ForumService::new(forum_store);
    forum
        .ensure_policy_thread()
        .await
        .context("seeding the forum policy thread")?;

    let state = AppState {
        auth: AuthService::new(
            users.clone(),
            accounts.clone(),
            Arc::new(Argon2Hasher),
            tokens.clone(),
            roster.clone(),
        ),
        profile: ProfileService::new(users, accounts, tokens.clone(), roster, gate.clone()),
        forum,
        events: EventsService::new(events_store, gate),
        ranking: RankingService::new(characters, portraits),
        tokens,
        login_limiter: Arc::new(FixedWindowLimiter::new(
            "login",
            cfg.rate_limit.login_max,
            cfg.rate_limit.login_window(),
        )),
        signup_limiter: Arc::new(FixedWindowLimiter::new(
            "signup",
            cfg.rate_limit.signup_max,
            cfg.rate_limit.signup_window(),
        )),
        metrics: Metrics::new(),
    };

    let app = build_router(
        state,
        RouterOptions {
            cors_origin: cfg.cors.origin.clone(),
            uploads_dir: cfg.data.uploads_dir.clone(),
            verbose_errors: !cfg.server.is_production(),
        },
    );

    let addr = cfg.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "aethelgard API listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("serving")?;

    Ok(())
}

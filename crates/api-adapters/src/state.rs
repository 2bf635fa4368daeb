//! Shared application state handed to every handler.

use std::sync::Arc;

use domains::ports::TokenService;
use services::{
    AuthService, EventsService, FixedWindowLimiter, ForumService, ProfileService, RankingService,
};

use crate::metrics::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub profile: ProfileService,
    pub forum: ForumService,
    pub events: EventsService,
    pub ranking: RankingService,
    pub tokens: Arc<dyn TokenService>,
    pub login_limiter: Arc<FixedWindowLimiter>,
    pub signup_limiter: Arc<FixedWindowLimiter>,
    pub metrics: Metrics,
}

//! Application lifecycle: build the stack once, tear it down once.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use gabarita_client::ApiClient;
use gabarita_games::{Game, GameHandle, GameSender};
use gabarita_session::{AuthSession, AuthState};
use gabarita_store::{FileStore, KeyValueStore, MemoryStore, SessionStorage};
use gabarita_transport::{CancelToken, HttpTransport, ReqwestTransport};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::{AppConfig, GabaritaError, RouteTracker};

/// A spawned game, seen only as something to stop.
trait RunningGame: Send + Sync {
    fn stop(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
    fn is_closed(&self) -> bool;
}

impl<G: Game> RunningGame for GameHandle<G> {
    fn stop(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            // Already stopped is fine.
            let _ = self.shutdown().await;
        })
    }

    fn is_closed(&self) -> bool {
        GameHandle::is_closed(self)
    }
}

/// The wired-up client core.
///
/// Owns the shared [`ApiClient`] and [`AuthSession`], the route tracker
/// the client redirects through, the root [`CancelToken`], and every
/// game spawned through it.
pub struct App<T: HttpTransport = ReqwestTransport> {
    config: AppConfig,
    client: Arc<ApiClient<T>>,
    session: Arc<AuthSession<T>>,
    routes: Arc<RouteTracker>,
    cancel: CancelToken,
    games: Mutex<Vec<Box<dyn RunningGame>>>,
    games_spawned: AtomicU64,
    closed: AtomicBool,
}

impl App<ReqwestTransport> {
    /// Builds the stack over HTTPS and restores any saved session.
    pub async fn init(config: AppConfig) -> Result<Self, GabaritaError> {
        let transport = ReqwestTransport::new(config.client.timeout)?;
        Self::with_transport(config, transport).await
    }
}

impl<T: HttpTransport> App<T> {
    /// Builds the stack over a caller-supplied transport.
    ///
    /// Steps, in order: storage, client (with a [`RouteTracker`]),
    /// session, then hydration. A stored token without a user record is
    /// resolved with a profile fetch before this returns. Hydration
    /// problems are logged and leave the session anonymous; only a
    /// storage file that cannot be opened fails startup.
    pub async fn with_transport(config: AppConfig, transport: T) -> Result<Self, GabaritaError> {
        let store: Arc<dyn KeyValueStore> = match &config.storage_path {
            Some(path) => Arc::new(FileStore::open(path)?),
            None => Arc::new(MemoryStore::new()),
        };
        let storage = SessionStorage::new(store);
        let routes = Arc::new(RouteTracker::default());
        let client = Arc::new(ApiClient::new(
            transport,
            config.client.clone(),
            storage,
            routes.clone(),
        ));
        let session = Arc::new(AuthSession::new(client.clone(), config.session.clone()));
        let cancel = CancelToken::new();

        match session.hydrate() {
            Ok(AuthState::Loading) => {
                if let Err(e) = session.restore(&cancel).await {
                    tracing::warn!(error = %e, "could not restore session from stored token");
                }
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "session hydration failed, starting signed out"),
        }

        tracing::info!(
            base_url = %config.client.base_url,
            persistent = config.storage_path.is_some(),
            authenticated = session.is_authenticated(),
            "app initialised"
        );

        Ok(Self {
            config,
            client,
            session,
            routes,
            cancel,
            games: Mutex::new(Vec::new()),
            games_spawned: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn client(&self) -> &Arc<ApiClient<T>> {
        &self.client
    }

    pub fn session(&self) -> &Arc<AuthSession<T>> {
        &self.session
    }

    pub fn routes(&self) -> &Arc<RouteTracker> {
        &self.routes
    }

    /// The root token. Cancelled by [`shutdown`](Self::shutdown).
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_shut_down(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Starts `game` in its own actor, stopped again by
    /// [`shutdown`](Self::shutdown).
    ///
    /// With a configured `game_seed`, the n-th game spawned gets seed
    /// `game_seed + n`, so a whole session replays identically.
    ///
    /// # Errors
    /// [`GameError::Unavailable`](gabarita_games::GameError::Unavailable)
    /// after shutdown.
    pub fn spawn_game<G: Game>(
        &self,
        game: G,
        subscriber: Option<GameSender<G>>,
    ) -> Result<GameHandle<G>, GabaritaError> {
        if self.is_shut_down() {
            return Err(gabarita_games::GameError::Unavailable.into());
        }
        let n = self.games_spawned.fetch_add(1, Ordering::SeqCst);
        let rng = match self.config.game_seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(n)),
            None => StdRng::from_os_rng(),
        };
        let name = game.name();
        let handle = gabarita_games::spawn_game(game, self.config.games.clone(), rng, subscriber);

        let mut games = self.games.lock().unwrap_or_else(|e| e.into_inner());
        games.retain(|g| !g.is_closed());
        games.push(Box::new(handle.clone()));
        tracing::debug!(game = name, running = games.len(), "game spawned");
        Ok(handle)
    }

    /// Cancels in-flight calls and stops every game. Idempotent.
    pub async fn shutdown(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.cancel.cancel();
        let games = std::mem::take(&mut *self.games.lock().unwrap_or_else(|e| e.into_inner()));
        for game in &games {
            game.stop().await;
        }
        tracing::info!(games = games.len(), "app shut down");
    }
}

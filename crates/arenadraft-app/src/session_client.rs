// HTTP client for the session service.
//
// Every call is a single attempt. Bodies are read as text and decoded with
// `decode_reply`, so an `{"error": ...}` body becomes `ApiError::Server`
// whatever the status code.

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use arenadraft_core::api::{ApiError, SessionApi};
use arenadraft_core::card::CardCounts;
use arenadraft_core::catalog::Catalog;
use arenadraft_core::channel::ws_base;
use arenadraft_core::protocol::{
    decode_reply, CreateSessionRequest, IdReply, PlayerUpdate, RegisterPlayerRequest,
    SessionOptions, SessionSnapshot, API_PATH,
};

/// Path of the static card catalog, relative to the server root.
const CATALOG_PATH: &str = "data/MTGACards.json";

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// URL builder for the session API. Ids are pushed as single path segments,
/// so any `/`, `?` or `#` in them is percent-encoded.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{base_url:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!(
                "{base_url:?} cannot carry a path"
            )));
        }
        Ok(Self { base })
    }

    fn route<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn sessions(&self) -> Url {
        self.route(API_PATH.split('/'))
    }

    pub fn session(&self, session: &str) -> Url {
        self.route(API_PATH.split('/').chain([session]))
    }

    pub fn players(&self, session: &str) -> Url {
        self.route(API_PATH.split('/').chain([session, "players"]))
    }

    pub fn player(&self, session: &str, player: &str) -> Url {
        self.route(API_PATH.split('/').chain([session, "players", player]))
    }

    pub fn card_pool(&self, session: &str, player: &str) -> Url {
        self.route(
            API_PATH
                .split('/')
                .chain([session, "players", player, "collection"]),
        )
    }

    pub fn catalog(&self) -> Url {
        self.route(CATALOG_PATH.split('/'))
    }

    /// Lobby socket for an already registered player.
    pub fn lobby_socket(&self, session: &str, player: &str) -> String {
        ws_base(self.player(session, player).as_str())
    }

    /// Lobby socket that registers with its first frame.
    pub fn registration_socket(&self, session: &str) -> String {
        ws_base(self.players(session).as_str())
    }
}

// ---------------------------------------------------------------------------
// HttpSessionClient
// ---------------------------------------------------------------------------

pub struct HttpSessionClient {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl HttpSessionClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            http: reqwest::Client::new(),
            endpoints: Endpoints::new(base_url)?,
        })
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!("GET {url}");
        let response = self.http.get(url).send().await.map_err(transport)?;
        read_reply(response).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!("POST {url}");
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        read_reply(response).await
    }
}

async fn read_reply<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    debug!("Response {status} ({} bytes)", body.len());
    Ok(decode_reply(&body)?)
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

#[async_trait]
impl SessionApi for HttpSessionClient {
    async fn create_session(
        &self,
        collection: &CardCounts,
        options: &SessionOptions,
    ) -> Result<String, ApiError> {
        let body = CreateSessionRequest {
            collection,
            options,
        };
        let reply: IdReply = self.post(self.endpoints.sessions(), &body).await?;
        Ok(reply.id)
    }

    async fn get_session(&self, session: &str) -> Result<SessionSnapshot, ApiError> {
        self.get(self.endpoints.session(session)).await
    }

    async fn register_player(
        &self,
        session: &str,
        name: &str,
        collection: &CardCounts,
    ) -> Result<String, ApiError> {
        let body = RegisterPlayerRequest { name, collection };
        let reply: IdReply = self.post(self.endpoints.players(session), &body).await?;
        Ok(reply.id)
    }

    async fn set_ready(
        &self,
        session: &str,
        player: &str,
        ready: bool,
    ) -> Result<SessionSnapshot, ApiError> {
        self.post(self.endpoints.player(session, player), &PlayerUpdate { ready })
            .await
    }

    async fn fetch_card_pool(&self, session: &str, player: &str) -> Result<CardCounts, ApiError> {
        self.get(self.endpoints.card_pool(session, player)).await
    }

    async fn fetch_catalog(&self) -> Result<Catalog, ApiError> {
        let url = self.endpoints.catalog();
        debug!("GET {url}");
        let response = self.http.get(url).send().await.map_err(transport)?;
        let body = response.text().await.map_err(transport)?;
        Ok(Catalog::from_json(&body)?)
    }
}

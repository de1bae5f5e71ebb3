use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Goal, GoalIndex},
    protocol::{goal_route, ChatRequest, ChatResponse, CHAT_ROUTE, GOALS_ROUTE},
};
use tracing::debug;
use url::Url;

pub mod error;

pub use error::ClientError;

/// The REST surface of the goals backend.
///
/// Update and delete address a goal by its position in the collection the
/// backend currently holds; callers are responsible for using a position from
/// the most recent `list_goals`.
#[async_trait]
pub trait GoalsApi: Send + Sync {
    async fn list_goals(&self) -> Result<Vec<Goal>, ClientError>;
    async fn create_goal(&self, goal: &Goal) -> Result<(), ClientError>;
    async fn update_goal(&self, index: GoalIndex, goal: &Goal) -> Result<(), ClientError>;
    async fn delete_goal(&self, index: GoalIndex) -> Result<(), ClientError>;
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError>;
}

pub struct HttpGoalsApi {
    http: Client,
    server_url: String,
}

impl HttpGoalsApi {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, ClientError> {
        let parsed = Url::parse(server_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: server_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl {
                url: server_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        Ok(Self {
            http,
            server_url: server_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{route}", self.server_url)
    }

    async fn send(&self, route: &str, request: RequestBuilder) -> Result<Response, ClientError> {
        let res = request.send().await.map_err(|source| ClientError::Transport {
            route: route.to_string(),
            source,
        })?;
        let status = res.status();
        debug!(route, status = status.as_u16(), "goals api response");
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                route: route.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(res)
    }

    async fn decode<T: DeserializeOwned>(route: &str, res: Response) -> Result<T, ClientError> {
        let bytes = res.bytes().await.map_err(|source| ClientError::Transport {
            route: route.to_string(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
            route: route.to_string(),
            source,
        })
    }
}

#[async_trait]
impl GoalsApi for HttpGoalsApi {
    async fn list_goals(&self) -> Result<Vec<Goal>, ClientError> {
        let res = self
            .send(GOALS_ROUTE, self.http.get(self.url(GOALS_ROUTE)))
            .await?;
        Self::decode(GOALS_ROUTE, res).await
    }

    async fn create_goal(&self, goal: &Goal) -> Result<(), ClientError> {
        self.send(GOALS_ROUTE, self.http.post(self.url(GOALS_ROUTE)).json(goal))
            .await?;
        Ok(())
    }

    async fn update_goal(&self, index: GoalIndex, goal: &Goal) -> Result<(), ClientError> {
        let route = goal_route(index);
        self.send(&route, self.http.put(self.url(&route)).json(goal))
            .await?;
        Ok(())
    }

    async fn delete_goal(&self, index: GoalIndex) -> Result<(), ClientError> {
        let route = goal_route(index);
        self.send(&route, self.http.delete(self.url(&route))).await?;
        Ok(())
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let res = self
            .send(CHAT_ROUTE, self.http.post(self.url(CHAT_ROUTE)).json(request))
            .await?;
        Self::decode(CHAT_ROUTE, res).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

//! Identity service client (teams and memberships)

use crate::config::HttpConfig;
use crate::error::Result;
use crate::service::ServiceClient;
use async_trait::async_trait;
use opsflow_core::{Team, TeamDirectory, TeamId, UserId};
use serde::Deserialize;

/// Membership record as returned by the identity service
#[derive(Debug, Clone, Deserialize)]
pub struct Membership {
    pub team_id: TeamId,
    pub user_id: UserId,
    #[serde(default)]
    pub role: Option<String>,
}

/// HTTPS client for the identity service
#[derive(Debug, Clone)]
pub struct IdentityApi {
    service: ServiceClient,
}

impl IdentityApi {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            service: ServiceClient::new(&config.identity_url, config)?,
        })
    }

    pub async fn list_memberships(&self, team_id: &TeamId) -> Result<Vec<Membership>> {
        let mut url = self.service.url(&["memberships"])?;
        url.query_pairs_mut().append_pair("team_id", team_id.as_str());
        self.service.get(url).await
    }
}

#[async_trait]
impl TeamDirectory for IdentityApi {
    async fn list_teams(&self) -> opsflow_core::Result<Vec<Team>> {
        let url = self.service.url(&["teams"])?;
        Ok(self.service.get(url).await?)
    }

    async fn count_members(&self, team_id: &TeamId) -> opsflow_core::Result<usize> {
        Ok(self.list_memberships(team_id).await?.len())
    }
}

//! Teams and per-team aggregation

use crate::aggregate::fan_out;
use crate::client::TeamDirectory;
use crate::error::Result;
use crate::ids::TeamId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub label: String,
    pub name: String,
}

/// A team together with its member count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSummary {
    pub team: Team,
    pub members: usize,
}

/// List all teams and fetch each team's member count concurrently
///
/// Fails as a whole with the first member-count error; no partial list is
/// returned.
pub async fn team_member_counts(directory: Arc<dyn TeamDirectory>) -> Result<Vec<TeamSummary>> {
    let teams = directory.list_teams().await?;
    tracing::debug!("Counting members of {} teams", teams.len());

    fan_out(teams, move |team| {
        let directory = Arc::clone(&directory);
        async move {
            let members = directory.count_members(&team.id).await?;
            Ok(TeamSummary { team, members })
        }
    })
    .await
}

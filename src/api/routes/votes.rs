//! Vote endpoints: cast today's vote and read the running result.

use crate::{
    api::{
        AppState,
        extract::{CurrentUser, ValidatedJson},
    },
    core::{
        authorize,
        capabilities::{Action, Subject, capability},
        votes::{self, TallyRow, Winner},
    },
    entities::vote,
    errors::{Error, Result},
};
use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    /// Id of a menu published in today's bucket.
    pub menu: i64,
}

/// Vote as served over the wire; `user` is the voter's username.
#[derive(Debug, Serialize)]
pub struct VoteBody {
    pub id: i64,
    pub user: String,
    pub menu: i64,
    pub date_time: DateTime<Utc>,
}

impl VoteBody {
    fn new(model: vote::Model, user: String) -> Self {
        Self {
            id: model.id,
            user,
            menu: model.menu_id,
            date_time: model.date_time,
        }
    }
}

/// `POST /vote/current-day/`
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    ValidatedJson(body): ValidatedJson<VoteRequest>,
) -> Result<(StatusCode, Json<VoteBody>)> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::Add, Subject::UserVote),
    )
    .await?;

    let vote = votes::cast_vote(&state.db, caller.id, body.menu).await?;
    Ok((
        StatusCode::CREATED,
        Json(VoteBody::new(vote, caller.username)),
    ))
}

/// `GET /vote/current-day-votes/`
pub async fn current_day_votes(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<Vec<TallyRow>>> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::List, Subject::UserVote),
    )
    .await?;

    let tally = votes::current_day_tally(&state.db).await?;
    Ok(Json(tally))
}

/// `GET /vote/current-day-result/`
pub async fn current_day_result(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<Winner>> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::List, Subject::UserVote),
    )
    .await?;

    let winner = votes::current_day_winner(&state.db)
        .await?
        .ok_or(Error::NoVotes)?;
    Ok(Json(winner))
}

//! Interaction endpoint.
//!
//! Receives one dispatched command invocation, runs it and answers with the
//! replies to render.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;
use validator::Validate;

use super::{error::ApiError, AppState};
use crate::friendcode::handlers::precheck;
use crate::friendcode::{
    execute, CommandContext, CommandKind, FriendCodeCommand, FriendCodeError, GuildRef, UserRef,
};
use crate::ratelimit;
use crate::reply::Reply;

/// Title for failures that happen before the subcommand is known.
const FALLBACK_TITLE: &str = "Friend Codes";

/// One command invocation delivered by the dispatcher.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Interaction {
    pub interaction_id: Uuid,
    #[validate(nested)]
    pub user: UserRef,
    #[validate(nested)]
    pub guild: Option<GuildRef>,
    pub subcommand: Option<String>,
    #[serde(default)]
    #[validate(length(max = 8, message = "Too many arguments"))]
    pub args: Vec<String>,
    /// Mentioned user, already resolved by the dispatcher.
    #[validate(nested)]
    pub target: Option<UserRef>,
}

/// Replies for one interaction, in display order.
#[derive(Debug, Serialize)]
pub struct InteractionResponse {
    pub interaction_id: Uuid,
    pub replies: Vec<Reply>,
}

/// POST /interactions
#[instrument(skip_all)]
pub async fn handle_interaction(
    State(state): State<AppState>,
    Json(interaction): Json<Interaction>,
) -> Result<Json<InteractionResponse>, ApiError> {
    interaction
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let interaction_id = interaction.interaction_id;
    debug!(
        %interaction_id,
        user_id = %interaction.user.id,
        subcommand = ?interaction.subcommand,
        "Interaction received"
    );
    let replies = dispatch(&state, interaction).await;

    Ok(Json(InteractionResponse {
        interaction_id,
        replies,
    }))
}

/// Run an interaction to completion. Every failure becomes a reply.
pub async fn dispatch(state: &AppState, interaction: Interaction) -> Vec<Reply> {
    let Interaction {
        user,
        guild,
        subcommand,
        args,
        target,
        ..
    } = interaction;

    let kind = match CommandKind::from_subcommand(subcommand.as_deref()) {
        Ok(kind) => kind,
        Err(e) => return vec![FriendCodeError::from(e).into_reply(FALLBACK_TITLE)],
    };

    let ctx = CommandContext {
        requester: user,
        guild,
    };

    match run(state, &ctx, kind, args, target).await {
        Ok(replies) => replies,
        Err(e) => {
            debug!(error = %e, ?kind, "Command failed");
            vec![e.into_reply(kind.error_title())]
        }
    }
}

async fn run(
    state: &AppState,
    ctx: &CommandContext,
    kind: CommandKind,
    args: Vec<String>,
    target: Option<UserRef>,
) -> Result<Vec<Reply>, FriendCodeError> {
    precheck(kind, &state.config, ctx)?;
    ratelimit::enforce(
        state.rate_limiter.as_ref(),
        kind.rate_limit_categories(),
        ctx.requester.id,
    )
    .await?;

    let command = FriendCodeCommand::parse(kind, args, target)?;
    execute(&state.stores, &state.config, ctx, command).await
}

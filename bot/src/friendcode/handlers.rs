//! Friend code command handlers.
//!
//! Each handler runs one parsed command against the stores and returns the
//! replies to send. Cooldowns are enforced before these are reached, after `precheck`.

use tracing::{info, instrument};
use uuid::Uuid;

use super::commands::{CommandContext, CommandKind, FriendCodeCommand, GuildRef, UserRef};
use super::error::FriendCodeError;
use super::store::Stores;
use super::types::{FriendCode, Identifier, Visibility};
use super::visibility::{resolve_lookup, LookupRequest};
use crate::config::Config;
use crate::reply::Reply;

/// Run a parsed command for the requester in `ctx`.
pub async fn execute(
    stores: &Stores,
    config: &Config,
    ctx: &CommandContext,
    command: FriendCodeCommand,
) -> Result<Vec<Reply>, FriendCodeError> {
    match command {
        FriendCodeCommand::Lookup { target, filter } => {
            let target = target.unwrap_or_else(|| ctx.requester.clone());
            lookup(stores, config, ctx, &target, filter).await
        }
        FriendCodeCommand::Add { identifier, code } => {
            add(stores, ctx, &identifier, &code).await.map(|r| vec![r])
        }
        FriendCodeCommand::List => list(stores, ctx).await.map(|r| vec![r]),
        FriendCodeCommand::ListAll => list_all(stores, config, ctx).await.map(|r| vec![r]),
        FriendCodeCommand::Remove { identifier } => {
            remove(stores, ctx, &identifier).await.map(|r| vec![r])
        }
        FriendCodeCommand::Visibility { value: None } => {
            show_visibility(stores, ctx).await.map(|r| vec![r])
        }
        FriendCodeCommand::Visibility { value: Some(value) } => {
            set_visibility(stores, ctx, value).await.map(|r| vec![r])
        }
        FriendCodeCommand::SetHome => set_home(stores, ctx).await.map(|r| vec![r]),
    }
}

fn require_guild(ctx: &CommandContext) -> Result<&GuildRef, FriendCodeError> {
    ctx.guild.as_ref().ok_or(FriendCodeError::GuildOnly)
}

/// Guild and permission checks that must pass before any cooldown is charged.
pub fn precheck(
    kind: CommandKind,
    config: &Config,
    ctx: &CommandContext,
) -> Result<(), FriendCodeError> {
    match kind {
        CommandKind::ListAll => authorize_list_all(config, ctx).map(|_| ()),
        _ => Ok(()),
    }
}

/// Only bot owners and the guild owner may list a whole guild.
fn authorize_list_all<'a>(
    config: &Config,
    ctx: &'a CommandContext,
) -> Result<&'a GuildRef, FriendCodeError> {
    let guild = require_guild(ctx)?;
    if !config.is_bot_owner(ctx.requester.id) && guild.owner_id != ctx.requester.id {
        return Err(FriendCodeError::NotPermitted);
    }
    Ok(guild)
}

/// Show the target's codes, one reply per entry, if they may be seen here.
#[instrument(skip(stores, config, ctx), fields(requester = %ctx.requester.id, target = %target.id))]
async fn lookup(
    stores: &Stores,
    config: &Config,
    ctx: &CommandContext,
    target: &UserRef,
    filter: Option<String>,
) -> Result<Vec<Reply>, FriendCodeError> {
    let entries = stores.codes.list(target.id, filter.as_deref()).await?;
    if entries.is_empty() {
        return Err(FriendCodeError::NoCodes {
            target_name: target.display_name.clone(),
            filter,
        });
    }

    let preference = stores.preferences.get(target.id).await?;
    resolve_lookup(&LookupRequest {
        requester_id: ctx.requester.id,
        target_id: target.id,
        target_name: &target.display_name,
        target_visibility: preference.as_ref().and_then(|p| p.visibility),
        target_home_guild: preference.as_ref().and_then(|p| p.home_guild),
        current_guild: ctx.guild_id(),
    })?;

    Ok(entries
        .into_iter()
        .map(|entry| {
            Reply::info(format!("F.C. for {}", entry.identifier), entry.code.clone())
                .with_thumbnail(format!("{}{}", config.qr_code_base_url, entry.code))
                .with_footer(format!("Owned by {}", target.display_name))
        })
        .collect())
}

#[instrument(skip(stores, ctx), fields(requester = %ctx.requester.id))]
async fn add(
    stores: &Stores,
    ctx: &CommandContext,
    identifier: &Identifier,
    code: &FriendCode,
) -> Result<Reply, FriendCodeError> {
    stores.codes.upsert(ctx.requester.id, identifier, code).await?;

    info!(identifier = %identifier, "Friend code stored");

    Ok(Reply::success(
        "Added Friend Code",
        format!("Added friend code `{code}` for `{identifier}`."),
    ))
}

#[instrument(skip(stores, ctx), fields(requester = %ctx.requester.id))]
async fn list(stores: &Stores, ctx: &CommandContext) -> Result<Reply, FriendCodeError> {
    let title = format!("F.C. List for {}", ctx.requester.display_name);
    let entries = stores.codes.list(ctx.requester.id, None).await?;

    if entries.is_empty() {
        return Ok(Reply::warning(
            title,
            "You don't have any friend codes stored. Add one with `fc add`.",
        ));
    }

    Ok(entries
        .into_iter()
        .fold(Reply::info(title, ""), |reply, entry| {
            reply.with_field(entry.identifier, entry.code, true)
        }))
}

/// Every code of members whose home guild is the current guild.
#[instrument(skip(stores, config, ctx), fields(requester = %ctx.requester.id))]
async fn list_all(
    stores: &Stores,
    config: &Config,
    ctx: &CommandContext,
) -> Result<Reply, FriendCodeError> {
    let guild = authorize_list_all(config, ctx)?;

    let title = format!("F.C. List for {}", guild.name);
    let summaries = stores.codes.list_by_home_guild(guild.id).await?;

    if summaries.is_empty() {
        return Ok(Reply::warning(
            title,
            "Nobody has set this server as their home server yet.",
        ));
    }

    Ok(summaries
        .into_iter()
        .fold(Reply::info(title, ""), |reply, summary| {
            let name = member_name(guild, summary.owner);
            reply.with_field(name, summary.lines, true)
        }))
}

/// Display name of a guild member, or the raw ID once they have left.
fn member_name(guild: &GuildRef, user_id: Uuid) -> String {
    guild
        .member_name(user_id)
        .map_or_else(|| user_id.to_string(), str::to_string)
}

#[instrument(skip(stores, ctx), fields(requester = %ctx.requester.id))]
async fn remove(
    stores: &Stores,
    ctx: &CommandContext,
    identifier: &str,
) -> Result<Reply, FriendCodeError> {
    let removed = stores.codes.remove(ctx.requester.id, identifier).await?;
    if removed == 0 {
        return Err(FriendCodeError::NotOnList(identifier.to_string()));
    }

    info!(identifier, "Friend code removed");

    Ok(Reply::success(
        "Removed Friend Code",
        format!("Removed {identifier} from your list."),
    ))
}

async fn show_visibility(stores: &Stores, ctx: &CommandContext) -> Result<Reply, FriendCodeError> {
    let visibility = stores
        .preferences
        .get_visibility(ctx.requester.id)
        .await?
        .unwrap_or(Visibility::DEFAULT);

    Ok(Reply::info(
        "Your F.C. Visibility",
        format!(
            "Your friend code visibility is currently set to {}",
            visibility.title()
        ),
    ))
}

#[instrument(skip(stores, ctx), fields(requester = %ctx.requester.id))]
async fn set_visibility(
    stores: &Stores,
    ctx: &CommandContext,
    visibility: Visibility,
) -> Result<Reply, FriendCodeError> {
    stores
        .preferences
        .set_visibility(ctx.requester.id, visibility)
        .await?;

    Ok(Reply::success(
        "Changed F.C. Visibility",
        format!(
            "Changed your friend code visibility to `{}`.",
            visibility.title()
        ),
    ))
}

#[instrument(skip(stores, ctx), fields(requester = %ctx.requester.id))]
async fn set_home(stores: &Stores, ctx: &CommandContext) -> Result<Reply, FriendCodeError> {
    let guild = require_guild(ctx)?;
    stores
        .preferences
        .set_home_guild(ctx.requester.id, guild.id)
        .await?;

    info!(guild_id = %guild.id, "Home guild set");

    Ok(Reply::success(
        "Home Server",
        format!("Set {} as your home server.", guild.name),
    ))
}

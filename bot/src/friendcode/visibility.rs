//! Lookup authorization.
//!
//! Decides whether a requester may see another user's friend codes.

use uuid::Uuid;

use super::types::Visibility;

/// Everything needed to authorize one lookup.
#[derive(Debug, Clone, Copy)]
pub struct LookupRequest<'a> {
    pub requester_id: Uuid,
    pub target_id: Uuid,
    /// Used only to render the denial message.
    pub target_name: &'a str,
    /// `None` when the target never chose a visibility.
    pub target_visibility: Option<Visibility>,
    pub target_home_guild: Option<Uuid>,
    /// `None` outside of a guild, e.g. in direct messages.
    pub current_guild: Option<Uuid>,
}

/// Why a lookup was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Target only shows codes to themselves.
    Hidden,
    /// Target never designated a home guild.
    NoHomeGuild,
    /// Target is private and this is not their home guild.
    NotHomeGuild,
}

/// A refused lookup, carrying what the reply needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupDenied {
    pub reason: DenyReason,
    pub target_name: String,
}

impl LookupDenied {
    /// Extra hint shown under the denial, if any.
    pub const fn footer(&self) -> Option<&'static str> {
        match self.reason {
            DenyReason::NoHomeGuild => Some("They need to run `fc sethome`"),
            DenyReason::Hidden | DenyReason::NotHomeGuild => None,
        }
    }
}

impl std::fmt::Display for LookupDenied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = &self.target_name;
        match self.reason {
            DenyReason::Hidden => write!(
                f,
                "`{name}` has their friend code visibility set to hidden. Only they can send them."
            ),
            DenyReason::NoHomeGuild => write!(f, "`{name}` doesn't have a home server set."),
            DenyReason::NotHomeGuild => write!(
                f,
                "This is not `{name}`'s home server and their visibility is set to private."
            ),
        }
    }
}

impl std::error::Error for LookupDenied {}

/// Authorize a lookup of the target's codes.
///
/// Resolution order (first match wins):
/// 1. Looking yourself up is always allowed
/// 2. Hidden targets are denied
/// 3. Targets without a home guild are denied, even when public
/// 4. Private (or unset) targets are denied outside their home guild
/// 5. Everything else is allowed
///
/// The caller is expected to have checked that the target has codes stored.
pub fn resolve_lookup(request: &LookupRequest<'_>) -> Result<(), LookupDenied> {
    if request.requester_id == request.target_id {
        return Ok(());
    }

    let deny = |reason| {
        Err(LookupDenied {
            reason,
            target_name: request.target_name.to_string(),
        })
    };

    let visibility = request.target_visibility.unwrap_or(Visibility::DEFAULT);

    if visibility == Visibility::Hidden {
        return deny(DenyReason::Hidden);
    }

    let Some(home_guild) = request.target_home_guild else {
        return deny(DenyReason::NoHomeGuild);
    };

    if visibility == Visibility::Private && request.current_guild != Some(home_guild) {
        return deny(DenyReason::NotHomeGuild);
    }

    Ok(())
}

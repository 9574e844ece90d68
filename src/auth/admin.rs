use std::collections::HashSet;

use super::middleware::AuthError;
use super::session::SessionIdentity;

/// Discord identities allowed to moderate. Fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct AdminList {
    ids: HashSet<String>,
}

impl AdminList {
    /// Parses a comma-separated list, ignoring blank entries.
    pub fn parse(raw: &str) -> Self {
        raw.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }

    #[must_use]
    pub fn is_admin(&self, discord_id: &str) -> bool {
        !discord_id.is_empty() && self.ids.contains(discord_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Distinguishes "no session" from "session without admin rights".
    pub fn require_admin<'a>(
        &self,
        session: Option<&'a SessionIdentity>,
    ) -> Result<&'a SessionIdentity, AuthError> {
        let identity = session.ok_or(AuthError::Unauthenticated)?;
        if !self.is_admin(&identity.discord_id) {
            return Err(AuthError::Forbidden);
        }
        Ok(identity)
    }
}

impl FromIterator<String> for AdminList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

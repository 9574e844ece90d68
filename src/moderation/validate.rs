use crate::error::{Error, Result};
use crate::types::RequestFields;

/// Longest accepted description, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 250;

/// Trims every field and turns blank optional fields into `None`.
pub(super) fn normalize(fields: RequestFields) -> RequestFields {
    fn optional(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    RequestFields {
        server_name: fields.server_name.trim().to_string(),
        url: optional(fields.url),
        description: optional(fields.description),
        tags: optional(fields.tags),
        logo_url: optional(fields.logo_url),
        owner_name: fields.owner_name.trim().to_string(),
        owner_discord: fields.owner_discord.trim().to_string(),
    }
}

/// Checks normalized listing fields.
pub(super) fn listing(fields: &RequestFields) -> Result<()> {
    if fields.server_name.is_empty()
        || fields.owner_name.is_empty()
        || fields.owner_discord.is_empty()
    {
        return Err(Error::Validation(
            "server_name, owner_name and owner_discord are required".to_string(),
        ));
    }

    let description_len = fields
        .description
        .as_deref()
        .map_or(0, |d| d.chars().count());
    if description_len > MAX_DESCRIPTION_LENGTH {
        return Err(Error::Validation(format!(
            "Description must be at most {MAX_DESCRIPTION_LENGTH} characters."
        )));
    }

    Ok(())
}

/// Joins trimmed, non-empty tags with commas.
pub(super) fn join_tags(tags: &[String]) -> Option<String> {
    let joined = tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(",");
    (!joined.is_empty()).then_some(joined)
}

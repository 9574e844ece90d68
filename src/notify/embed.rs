use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::types::ServerRequest;

pub const COLOR_NEW: u32 = 0xFF66AA;
pub const COLOR_APPROVED: u32 = 0x57F287;
pub const COLOR_REJECTED: u32 = 0xED4245;

const SNIPPET_LIMIT: usize = 200;
const UNNAMED: &str = "unnamed server";
const NO_DESCRIPTION: &str = "No description was provided.";

#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl Field {
    fn new(name: &str, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
            inline,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Footer {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Author {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    pub fields: Vec<Field>,
    pub timestamp: String,
    pub footer: Footer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
}

pub fn new_request(request: &ServerRequest, env_label: &str) -> Embed {
    let name = coalesce(Some(&request.server_name), UNNAMED);
    Embed {
        title: format!("🆕 New server request · {name}"),
        description: format!(
            "A new osu! private server has been submitted and is waiting in the review queue.\n\n{}",
            quoted_snippet(request)
        ),
        url: None,
        color: COLOR_NEW,
        author: Some(Author {
            name: name.clone(),
            url: None,
        }),
        fields: vec![
            Field::new("Owner", owner_line(request), true),
            Field::new("Request ID", format!("`{}`", request.id), true),
            Field::new("Submitted at", submitted_at(request), true),
            Field::new("Server URL", coalesce(request.url.as_ref(), "N/A"), false),
            Field::new("Tags", format_tags(request.tags.as_deref()), false),
        ],
        timestamp: now_rfc3339(),
        footer: footer(env_label, "new server request"),
        thumbnail: thumbnail(request),
    }
}

pub fn approved(request: &ServerRequest, server_id: i64, server_url: &str, env_label: &str) -> Embed {
    Embed {
        title: "🟢 Server approved".to_string(),
        description: "The request has been approved and the server is now live on mossai."
            .to_string(),
        url: Some(server_url.to_string()),
        color: COLOR_APPROVED,
        author: Some(Author {
            name: coalesce(Some(&request.server_name), UNNAMED),
            url: Some(server_url.to_string()),
        }),
        fields: vec![
            Field::new("Server ID", format!("`{server_id}`"), true),
            Field::new("Request ID", format!("`{}`", request.id), true),
            Field::new("Owner", owner_line(request), false),
            Field::new("Server URL", coalesce(request.url.as_ref(), "N/A"), false),
            Field::new("Tags", format_tags(request.tags.as_deref()), false),
        ],
        timestamp: now_rfc3339(),
        footer: footer(env_label, "server approved"),
        thumbnail: thumbnail(request),
    }
}

pub fn rejected(request: &ServerRequest, env_label: &str) -> Embed {
    Embed {
        title: "⛔ Server request rejected".to_string(),
        description: format!(
            "The server request was rejected.\n\n{}",
            quoted_snippet(request)
        ),
        url: None,
        color: COLOR_REJECTED,
        author: Some(Author {
            name: coalesce(Some(&request.server_name), UNNAMED),
            url: None,
        }),
        fields: vec![
            Field::new("Owner", owner_line(request), true),
            Field::new("Request ID", format!("`{}`", request.id), true),
            Field::new("Submitted at", submitted_at(request), false),
        ],
        timestamp: now_rfc3339(),
        footer: footer(env_label, "server rejected"),
        thumbnail: None,
    }
}

/// Trims `s` and cuts it to at most `limit` characters, ending with `…` when cut.
pub fn truncate(s: &str, limit: usize) -> String {
    let s = s.trim();
    if limit == 0 || s.chars().count() <= limit {
        return s.to_string();
    }
    if limit == 1 {
        return s.chars().take(1).collect();
    }
    let mut out: String = s.chars().take(limit - 1).collect();
    out.push('…');
    out
}

/// Renders comma-separated tags as inline code joined by ` · `, or `none`.
pub fn format_tags(tags: Option<&str>) -> String {
    let rendered: Vec<String> = tags
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| format!("`{t}`"))
        .collect();

    if rendered.is_empty() {
        "none".to_string()
    } else {
        rendered.join(" · ")
    }
}

/// Renders an owner with a Discord mention when the id is a snowflake.
pub fn format_owner(name: &str, discord_id: &str) -> String {
    let name = coalesce(Some(name), "unknown");
    let discord_id = discord_id.trim();
    if discord_id.is_empty() {
        name
    } else if discord_id.parse::<i64>().is_ok() {
        format!("{name} (<@{discord_id}>)")
    } else {
        format!("{name} ({discord_id})")
    }
}

pub fn footer(env_label: &str, context: &str) -> Footer {
    Footer {
        text: format!("mossai · {context} · {env_label}"),
    }
}

fn coalesce<S: AsRef<str>>(value: Option<S>, fallback: &str) -> String {
    match value.as_ref().map(|v| v.as_ref().trim()) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

fn quoted_snippet(request: &ServerRequest) -> String {
    let description = coalesce(request.description.as_ref(), NO_DESCRIPTION);
    format!("> {}", truncate(&description, SNIPPET_LIMIT))
}

fn owner_line(request: &ServerRequest) -> String {
    format_owner(&request.owner_name, &request.owner_discord)
}

fn submitted_at(request: &ServerRequest) -> String {
    request.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn thumbnail(request: &ServerRequest) -> Option<Thumbnail> {
    request
        .logo_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(|url| Thumbnail {
            url: url.to_string(),
        })
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::types::RequestStatus;

    fn request() -> ServerRequest {
        ServerRequest {
            id: 7,
            server_name: "Foo".to_string(),
            url: Some("https://foo.example".to_string()),
            description: None,
            tags: Some("relax, ,autopilot".to_string()),
            logo_url: Some("https://foo.example/logo.png".to_string()),
            owner_name: "Bar".to_string(),
            owner_discord: "123".to_string(),
            status: RequestStatus::Pending,
            created_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("  short  ", 200), "short");
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abcdef", 1), "a");
        assert_eq!(truncate("ééééé", 3), "éé…");

        let long = "x".repeat(250);
        let cut = truncate(&long, SNIPPET_LIMIT);
        assert_eq!(cut.chars().count(), SNIPPET_LIMIT);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_format_tags() {
        assert_eq!(format_tags(Some("a, b")), "`a` · `b`");
        assert_eq!(format_tags(Some(" , ")), "none");
        assert_eq!(format_tags(None), "none");
    }

    #[test]
    fn test_format_owner() {
        assert_eq!(format_owner("Bar", "123"), "Bar (<@123>)");
        assert_eq!(format_owner("Bar", "bar#0001"), "Bar (bar#0001)");
        assert_eq!(format_owner(" ", ""), "unknown");
    }

    #[test]
    fn test_new_request_embed() {
        let embed = new_request(&request(), "local");
        assert_eq!(embed.color, COLOR_NEW);
        assert_eq!(embed.title, "🆕 New server request · Foo");
        assert!(embed.description.ends_with("> No description was provided."));
        assert_eq!(embed.footer.text, "mossai · new server request · local");
        assert_eq!(embed.fields[0].value, "Bar (<@123>)");
        assert_eq!(embed.fields[1].value, "`7`");
        assert_eq!(embed.fields[2].value, "2026-01-02T03:04:05Z");
        assert_eq!(embed.fields[4].value, "`relax` · `autopilot`");
        assert_eq!(
            embed.thumbnail.map(|t| t.url).as_deref(),
            Some("https://foo.example/logo.png")
        );
    }

    #[test]
    fn test_approved_embed_links_server() {
        let url = "https://mossai.example/servers/3";
        let embed = approved(&request(), 3, url, "prod");
        assert_eq!(embed.color, COLOR_APPROVED);
        assert_eq!(embed.url.as_deref(), Some(url));
        assert_eq!(embed.author.unwrap().url.as_deref(), Some(url));
        assert_eq!(embed.fields[0].value, "`3`");
        assert_eq!(embed.footer.text, "mossai · server approved · prod");
    }

    #[test]
    fn test_rejected_embed() {
        let embed = rejected(&request(), "local");
        assert_eq!(embed.color, COLOR_REJECTED);
        assert!(embed.thumbnail.is_none());
        assert_eq!(embed.fields.len(), 3);
    }

    #[test]
    fn test_payload_omits_empty_content() {
        let payload = WebhookPayload {
            content: None,
            embeds: vec![rejected(&request(), "local")],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("content").is_none());
        assert_eq!(json["embeds"][0]["color"], COLOR_REJECTED);
        assert!(json["embeds"][0].get("url").is_none());
    }
}

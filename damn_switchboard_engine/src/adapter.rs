//! Ingestion layer: turn untrusted inbound JSON into `NormalizedMessage`s.
//!
//! Nothing here can fail. Every missing, null or mistyped field falls back to
//! its default; bad proposals are left for moderation to reject.

use serde_json::{Map, Value};

use damn_switchboard_core::{Body, Header, MessageKind, NormalizedMessage};

/// A raw message as delivered by a collaborator (inbox file, relay, tests).
///
/// Fields are kept as loose JSON; interpretation happens in `normalize`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawMessage {
    pub id: Option<Value>,
    pub time_utc: Option<Value>,
    pub kind: Option<Value>,
    pub header: Option<Value>,
    pub body: Option<Value>,
}

impl RawMessage {
    /// Raw message with only a body; sender and id are left to defaults.
    pub fn with_body(body: Value) -> Self {
        Self {
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(Value::String(id.into()));
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(Value::String(kind.into()));
        self
    }

    pub fn time_utc(mut self, t: impl Into<String>) -> Self {
        self.time_utc = Some(Value::String(t.into()));
        self
    }

    /// Set one header field, creating the header object if needed.
    pub fn header_field(mut self, key: &str, value: Value) -> Self {
        let mut header = match self.header.take() {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        header.insert(key.to_string(), value);
        self.header = Some(Value::Object(header));
        self
    }

    pub fn agent(self, agent_id: impl Into<String>) -> Self {
        self.header_field("agent_id", Value::String(agent_id.into()))
    }

    pub fn domains<I, S>(self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = domains.into_iter().map(|d| Value::String(d.into())).collect();
        self.header_field("domains", Value::Array(list))
    }

    /// Supplied id, if it is a non-empty string.
    pub fn supplied_id(&self) -> Option<&str> {
        non_empty_str(self.id.as_ref())
    }
}

impl From<Value> for RawMessage {
    fn from(v: Value) -> Self {
        match v {
            Value::Object(mut map) => Self {
                id: map.remove("id"),
                time_utc: map.remove("time_utc"),
                kind: map.remove("type"),
                header: map.remove("header"),
                body: map.remove("body"),
            },
            // non-objects carry nothing usable
            _ => Self::default(),
        }
    }
}

impl From<&Value> for RawMessage {
    fn from(v: &Value) -> Self {
        RawMessage::from(v.clone())
    }
}

fn non_empty_str(v: Option<&Value>) -> Option<&str> {
    v.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn string_or(v: Option<&Value>, default: &str) -> String {
    v.and_then(Value::as_str).unwrap_or(default).to_string()
}

/// Defaults supplied by the engine for one ingest.
#[derive(Clone, Copy, Debug)]
pub struct IngestContext<'a> {
    /// Final id, already checked for uniqueness by the caller.
    pub id: &'a str,
    /// Ingestion timestamp, used when the message has none.
    pub now: &'a str,
    /// Active capsule id, used when the header has none.
    pub capsule_id: &'a str,
}

fn normalize_header(raw: Option<&Value>, capsule_id: &str) -> Header {
    let Some(Value::Object(h)) = raw else {
        return Header::defaulted(capsule_id);
    };

    let domains = h
        .get("domains")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Header {
        agent_id: string_or(h.get("agent_id"), Header::UNKNOWN_AGENT),
        capsule_id: string_or(h.get("capsule_id"), capsule_id),
        persona_version: string_or(h.get("persona_version"), Header::DEFAULT_PERSONA_VERSION),
        domains,
        auth: h.get("auth").filter(|a| !a.is_null()).cloned(),
    }
}

/// Fill every default and produce the canonical message.
pub fn normalize(raw: RawMessage, ctx: IngestContext<'_>) -> NormalizedMessage {
    let time_utc = non_empty_str(raw.time_utc.as_ref()).unwrap_or(ctx.now).to_string();
    let kind = non_empty_str(raw.kind.as_ref())
        .map(MessageKind::from)
        .unwrap_or_default();
    let header = normalize_header(raw.header.as_ref(), ctx.capsule_id);
    let body: Body = match raw.body {
        Some(Value::Object(map)) => map,
        _ => Body::new(),
    };

    NormalizedMessage {
        id: ctx.id.to_string(),
        time_utc,
        kind,
        header,
        body,
    }
}

/// Helper: read a `{ "messages": [...] }` document into raw messages.
///
/// A missing or non-array `messages` field yields an empty batch.
pub fn messages_from_inbox(inbox: &Value) -> Vec<RawMessage> {
    inbox
        .get("messages")
        .and_then(Value::as_array)
        .map(|list| list.iter().map(RawMessage::from).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CTX: IngestContext<'static> = IngestContext {
        id: "msg-1",
        now: "2025-06-01T12:00:00.000Z",
        capsule_id: "Cap.v1",
    };

    #[test]
    fn empty_object_gets_every_default() {
        let n = normalize(RawMessage::from(json!({})), CTX);
        assert_eq!(n.id, "msg-1");
        assert_eq!(n.time_utc, CTX.now);
        assert_eq!(n.kind, MessageKind::Propose);
        assert_eq!(n.header, Header::defaulted("Cap.v1"));
        assert!(n.body.is_empty());
    }

    #[test]
    fn garbage_never_panics() {
        for v in [json!(null), json!(3), json!("PROPOSE"), json!([1, 2])] {
            let n = normalize(RawMessage::from(v), CTX);
            assert_eq!(n.header.agent_id, "Unknown");
            assert!(n.body.is_empty());
        }
        let n = normalize(
            RawMessage::from(json!({
                "type": 5, "time_utc": "", "header": "Claude", "body": "free text"
            })),
            CTX,
        );
        assert_eq!(n.kind, MessageKind::Propose);
        assert_eq!(n.time_utc, CTX.now);
        assert_eq!(n.header.agent_id, "Unknown");
        assert!(n.body.is_empty());
    }

    #[test]
    fn supplied_fields_are_kept() {
        let raw = RawMessage::from(json!({
            "id": "ignored-here",
            "time_utc": "2024-02-02T00:00:00Z",
            "type": "COMMIT",
            "header": {
                "agent_id": "Grok",
                "capsule_id": "Other.v2",
                "persona_version": "1.2.3",
                "domains": ["web", 9, "robotics"],
                "auth": {"sig": "abc"}
            },
            "body": {"goal": "g", "extra": [1]}
        }));
        assert_eq!(raw.supplied_id(), Some("ignored-here"));
        let n = normalize(raw, CTX);
        assert_eq!(n.time_utc, "2024-02-02T00:00:00Z");
        assert_eq!(n.kind, MessageKind::Commit);
        assert_eq!(n.header.agent_id, "Grok");
        assert_eq!(n.header.capsule_id, "Other.v2");
        assert_eq!(n.header.persona_version, "1.2.3");
        assert_eq!(n.header.domains, vec!["web".to_string(), "robotics".to_string()]);
        assert_eq!(n.header.auth, Some(json!({"sig": "abc"})));
        assert_eq!(n.body.get("extra"), Some(&json!([1])));
    }

    #[test]
    fn null_header_fields_default() {
        let n = normalize(
            RawMessage::from(json!({"header": {"agent_id": null, "domains": "web", "auth": null}})),
            CTX,
        );
        assert_eq!(n.header.agent_id, "Unknown");
        assert!(n.header.domains.is_empty());
        assert_eq!(n.header.auth, None);
    }

    #[test]
    fn builder_matches_json_form() {
        let built = RawMessage::with_body(json!({"goal": "g"}))
            .id("p1")
            .agent("Claude")
            .domains(["web"]);
        let parsed = RawMessage::from(json!({
            "id": "p1",
            "header": {"agent_id": "Claude", "domains": ["web"]},
            "body": {"goal": "g"}
        }));
        assert_eq!(built, parsed);
    }

    #[test]
    fn inbox_messages_are_lenient() {
        assert_eq!(messages_from_inbox(&json!({"messages": [{}, 1]})).len(), 2);
        assert!(messages_from_inbox(&json!({"messages": {"a": 1}})).is_empty());
        assert!(messages_from_inbox(&json!({})).is_empty());
        assert!(messages_from_inbox(&json!(null)).is_empty());
    }
}

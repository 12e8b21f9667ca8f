//! Server event types, envelope schema, and event bus.
//!
//! Aggregates domain events (note lifecycle, team membership changes,
//! settings updates) into a single broadcast channel. Downstream
//! consumers — the visit recorder, future webhook or SSE surfaces —
//! subscribe independently. The bus is an explicit handle passed to
//! services and handlers; there is no global registry.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::MemberRole;

// ============================================================================
// Event Envelope
// ============================================================================

/// Actor metadata for event attribution.
#[derive(Debug, Clone, Serialize)]
pub struct EventActor {
    /// Actor type: `"system"` or `"user"`.
    pub kind: String,
    /// Optional actor identifier (user id).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl EventActor {
    /// System actor (startup tasks, internal processes).
    pub fn system() -> Self {
        Self {
            kind: "system".to_string(),
            id: None,
        }
    }

    /// Authenticated user actor.
    pub fn user(id: i64) -> Self {
        Self {
            kind: "user".to_string(),
            id: Some(id.to_string()),
        }
    }
}

/// Optional emission context for events that carry additional metadata.
#[derive(Debug, Clone, Default)]
pub struct EventContext {
    /// Who caused this event. Defaults to the system actor.
    pub actor: Option<EventActor>,
    /// Correlation ID for tracing related events across operations.
    pub correlation_id: Option<Uuid>,
}

/// Versioned server event envelope.
///
/// The `event_type` field uses dot-namespaced names (e.g.
/// `"team.member_joined"`). `payload_version` starts at `1` and
/// increments on breaking payload changes; consumers should ignore
/// unknown fields.
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope {
    /// Unique event identifier (UUIDv7 for temporal ordering).
    pub event_id: Uuid,
    /// Namespaced event type.
    pub event_type: String,
    /// When the event occurred (UTC).
    pub occurred_at: DateTime<Utc>,
    /// Who caused this event.
    pub actor: EventActor,
    /// Type of entity this event relates to (e.g. `"note"`, `"team"`).
    pub entity_type: &'static str,
    /// Internal id of the note this event relates to.
    pub entity_id: String,
    /// Correlation ID for tracing related events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,
    /// Payload schema version.
    pub payload_version: u32,
    /// Domain-specific event data.
    pub payload: ServerEvent,
}

impl EventEnvelope {
    /// Create an envelope from a ServerEvent with default (system) context.
    pub fn new(event: ServerEvent) -> Self {
        Self::with_context(event, EventContext::default())
    }

    /// Create an envelope with explicit context.
    pub fn with_context(event: ServerEvent, ctx: EventContext) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            event_type: event.namespaced_event_type().to_string(),
            occurred_at: Utc::now(),
            actor: ctx.actor.unwrap_or_else(EventActor::system),
            entity_type: event.entity_type(),
            entity_id: event.note_id().to_string(),
            correlation_id: ctx.correlation_id,
            payload_version: 1,
            payload: event,
        }
    }
}

// ============================================================================
// Server Event (domain payloads)
// ============================================================================

/// Unified server event type.
///
/// Serialized as JSON with a `type` tag field, e.g.
/// `{"type":"MemberJoined","note_id":7,"user_id":3,"role":0}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// A note was created.
    NoteCreated {
        note_id: i64,
        public_id: String,
        creator_id: i64,
    },
    /// An authenticated user opened a note they are allowed to read.
    NoteVisited { note_id: i64, user_id: i64 },
    /// A note was deleted.
    NoteDeleted { note_id: i64 },
    /// A user redeemed an invitation and entered the note's team.
    MemberJoined {
        note_id: i64,
        user_id: i64,
        role: MemberRole,
    },
    /// An existing member's role was changed.
    MemberRoleChanged {
        note_id: i64,
        user_id: i64,
        role: MemberRole,
    },
    /// A member was removed from a note's team.
    MemberRemoved { note_id: i64, user_id: i64 },
    /// A note's settings were updated (visibility, hostname, cover, or
    /// invitation hash).
    SettingsUpdated { note_id: i64, is_public: bool },
}

impl ServerEvent {
    /// Returns the event type name (the serde `type` tag).
    pub fn event_type(&self) -> &'static str {
        match self {
            ServerEvent::NoteCreated { .. } => "NoteCreated",
            ServerEvent::NoteVisited { .. } => "NoteVisited",
            ServerEvent::NoteDeleted { .. } => "NoteDeleted",
            ServerEvent::MemberJoined { .. } => "MemberJoined",
            ServerEvent::MemberRoleChanged { .. } => "MemberRoleChanged",
            ServerEvent::MemberRemoved { .. } => "MemberRemoved",
            ServerEvent::SettingsUpdated { .. } => "SettingsUpdated",
        }
    }

    /// Returns the namespaced event type for the envelope.
    pub fn namespaced_event_type(&self) -> &'static str {
        match self {
            ServerEvent::NoteCreated { .. } => "note.created",
            ServerEvent::NoteVisited { .. } => "note.visited",
            ServerEvent::NoteDeleted { .. } => "note.deleted",
            ServerEvent::MemberJoined { .. } => "team.member_joined",
            ServerEvent::MemberRoleChanged { .. } => "team.role_changed",
            ServerEvent::MemberRemoved { .. } => "team.member_removed",
            ServerEvent::SettingsUpdated { .. } => "settings.updated",
        }
    }

    /// Returns the entity type this event relates to.
    pub fn entity_type(&self) -> &'static str {
        match self {
            ServerEvent::NoteCreated { .. }
            | ServerEvent::NoteVisited { .. }
            | ServerEvent::NoteDeleted { .. } => "note",
            ServerEvent::MemberJoined { .. }
            | ServerEvent::MemberRoleChanged { .. }
            | ServerEvent::MemberRemoved { .. } => "team",
            ServerEvent::SettingsUpdated { .. } => "settings",
        }
    }

    /// Internal id of the note the event is scoped to. Every event in
    /// this system is note-scoped.
    pub fn note_id(&self) -> i64 {
        match self {
            ServerEvent::NoteCreated { note_id, .. }
            | ServerEvent::NoteVisited { note_id, .. }
            | ServerEvent::NoteDeleted { note_id }
            | ServerEvent::MemberJoined { note_id, .. }
            | ServerEvent::MemberRoleChanged { note_id, .. }
            | ServerEvent::MemberRemoved { note_id, .. }
            | ServerEvent::SettingsUpdated { note_id, .. } => *note_id,
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Broadcast-based event bus for distributing server events to
/// multiple consumers.
///
/// Uses `tokio::sync::broadcast` with a configurable buffer size.
/// Events are wrapped in [`EventEnvelope`] with metadata before
/// broadcast. Slow receivers that fall behind receive a `Lagged`
/// error and miss events; freshness matters more than completeness
/// for every current consumer.
pub struct EventBus {
    tx: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    ///
    /// Recommended: 256 for production, 32 for tests.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event to all subscribers (system actor).
    ///
    /// If there are no active subscribers, the event is silently
    /// dropped.
    pub fn emit(&self, event: ServerEvent) {
        let envelope = EventEnvelope::new(event);
        let subscriber_count = self.tx.receiver_count();
        tracing::debug!(
            event_type = %envelope.event_type,
            event_id = %envelope.event_id,
            subscriber_count,
            "EventBus emit"
        );
        let _ = self.tx.send(envelope);
    }

    /// Emit an event with explicit context (actor, correlation).
    ///
    /// Use this from request handlers where the acting user is known.
    pub fn emit_with_context(&self, event: ServerEvent, ctx: EventContext) {
        let envelope = EventEnvelope::with_context(event, ctx);
        let subscriber_count = self.tx.receiver_count();
        tracing::debug!(
            event_type = %envelope.event_type,
            event_id = %envelope.event_id,
            subscriber_count,
            "EventBus emit (with context)"
        );
        let _ = self.tx.send(envelope);
    }

    /// Subscribe to receive enveloped events. Each subscriber gets its
    /// own independent stream.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.tx.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Core data models for noteplex.
//!
//! These types are shared across all noteplex crates and represent the
//! core domain entities. Types that cross the HTTP boundary serialize
//! with camelCase field names to match the public API contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// =============================================================================
// USER TYPES
// =============================================================================

/// A registered user account.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request for creating a new user.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub photo: Option<String>,
}

// =============================================================================
// NOTE TYPES
// =============================================================================

/// A note. The `public_id` is the only identifier exposed in URLs;
/// `id` is the internal database key used for relations and team rows.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub public_id: String,
    /// Editor document content (rich-text JSON).
    pub content: JsonValue,
    pub creator_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request for creating a new note.
///
/// Creation seeds the note's settings row and the creator's Write
/// membership in one transaction; `parent_note_id` additionally links
/// the note under an existing parent.
#[derive(Debug, Clone)]
pub struct CreateNoteRequest {
    pub creator_id: i64,
    pub content: JsonValue,
    pub parent_note_id: Option<i64>,
}

/// Parent/child relation row. Each note has at most one parent.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NoteRelation {
    pub note_id: i64,
    pub parent_id: i64,
}

// =============================================================================
// TEAM TYPES
// =============================================================================

/// Access role a team member holds on a note.
///
/// Serialized as its numeric value (`0` = Read, `1` = Write) on the wire
/// and stored the same way in the database.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(into = "i32", try_from = "i32")]
#[repr(i32)]
pub enum MemberRole {
    Read = 0,
    Write = 1,
}

impl From<MemberRole> for i32 {
    fn from(role: MemberRole) -> Self {
        role as i32
    }
}

impl TryFrom<i32> for MemberRole {
    type Error = String;

    fn try_from(value: i32) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(MemberRole::Read),
            1 => Ok(MemberRole::Write),
            other => Err(format!("invalid member role: {}", other)),
        }
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// A user's membership in a note's team.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: i64,
    pub note_id: i64,
    pub user_id: i64,
    pub role: MemberRole,
    pub created_at: DateTime<Utc>,
}

/// Public form of a team membership, keyed by the note's public id
/// rather than its internal one. Returned from invitation joins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberPublic {
    pub user_id: i64,
    pub note_id: String,
    pub role: MemberRole,
}

// =============================================================================
// NOTE SETTINGS TYPES
// =============================================================================

/// Per-note settings. One row per note, created alongside the note;
/// a missing row for an existing note is a data error, never a state.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NoteSettings {
    pub id: i64,
    pub note_id: i64,
    pub is_public: bool,
    pub invitation_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}

/// Partial update for note settings. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchNoteSettingsRequest {
    pub is_public: Option<bool>,
    pub custom_hostname: Option<String>,
    pub cover: Option<String>,
}

/// Note settings with the note's direct team embedded, as returned by
/// the settings read endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsWithTeam {
    #[serde(flatten)]
    pub settings: NoteSettings,
    pub team: Vec<TeamMember>,
}

// =============================================================================
// FILE TYPES
// =============================================================================

/// What a stored file is attached to.
///
/// Serialized numerically: `1` = note attachment, `2` = user avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(into = "i32", try_from = "i32")]
#[repr(i32)]
pub enum FileKind {
    NoteAttachment = 1,
    UserAvatar = 2,
}

impl From<FileKind> for i32 {
    fn from(kind: FileKind) -> Self {
        kind as i32
    }
}

impl TryFrom<i32> for FileKind {
    type Error = String;

    fn try_from(value: i32) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(FileKind::NoteAttachment),
            2 => Ok(FileKind::UserAvatar),
            other => Err(format!("invalid file kind: {}", other)),
        }
    }
}

/// An uploaded file stored inline. Note attachments carry the owning
/// note id; avatars and other unbound kinds leave it empty.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub id: i64,
    /// Random access key used in download URLs.
    pub key: String,
    pub kind: FileKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_id: Option<i64>,
    pub uploader_id: i64,
    pub filename: String,
    #[serde(skip)]
    pub data: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

/// Request for storing a new file.
#[derive(Debug, Clone)]
pub struct CreateFileRequest {
    pub kind: FileKind,
    pub note_id: Option<i64>,
    pub uploader_id: i64,
    pub filename: String,
    pub data: Vec<u8>,
}

// =============================================================================
// VISIT TYPES
// =============================================================================

/// Record of a user opening a note. One row per (note, user) pair,
/// refreshed on each visit.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NoteVisit {
    pub note_id: i64,
    pub user_id: i64,
    pub visited_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_role_numeric_serialization() {
        assert_eq!(serde_json::to_string(&MemberRole::Read).unwrap(), "0");
        assert_eq!(serde_json::to_string(&MemberRole::Write).unwrap(), "1");
    }

    #[test]
    fn test_member_role_numeric_deserialization() {
        let read: MemberRole = serde_json::from_str("0").unwrap();
        let write: MemberRole = serde_json::from_str("1").unwrap();
        assert_eq!(read, MemberRole::Read);
        assert_eq!(write, MemberRole::Write);
    }

    #[test]
    fn test_member_role_rejects_unknown_value() {
        let result = serde_json::from_str::<MemberRole>("7");
        assert!(result.is_err());
    }

    #[test]
    fn test_member_role_ordering() {
        // Write strictly above Read; policies rely on exact matches,
        // but ordering keeps comparisons unambiguous elsewhere.
        assert!(MemberRole::Write > MemberRole::Read);
    }

    #[test]
    fn test_member_role_display() {
        assert_eq!(MemberRole::Read.to_string(), "read");
        assert_eq!(MemberRole::Write.to_string(), "write");
    }

    #[test]
    fn test_file_kind_numeric_serialization() {
        assert_eq!(
            serde_json::to_string(&FileKind::NoteAttachment).unwrap(),
            "1"
        );
        assert_eq!(serde_json::to_string(&FileKind::UserAvatar).unwrap(), "2");
    }

    #[test]
    fn test_file_kind_rejects_zero() {
        let result = serde_json::from_str::<FileKind>("0");
        assert!(result.is_err());
    }

    #[test]
    fn test_team_member_public_uses_camel_case() {
        let member = TeamMemberPublic {
            user_id: 42,
            note_id: "TJmEb89e0l".to_string(),
            role: MemberRole::Read,
        };
        let json = serde_json::to_string(&member).unwrap();
        assert!(json.contains(r#""userId":42"#));
        assert!(json.contains(r#""noteId":"TJmEb89e0l""#));
        assert!(json.contains(r#""role":0"#));
    }

    #[test]
    fn test_note_settings_optional_fields_skipped() {
        let settings = NoteSettings {
            id: 1,
            note_id: 2,
            is_public: true,
            invitation_hash: "Hzh2hy4igf".to_string(),
            custom_hostname: None,
            cover: None,
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains(r#""isPublic":true"#));
        assert!(json.contains(r#""invitationHash":"Hzh2hy4igf""#));
        assert!(!json.contains("customHostname"));
        assert!(!json.contains("cover"));
    }

    #[test]
    fn test_settings_with_team_flattens_settings() {
        let payload = SettingsWithTeam {
            settings: NoteSettings {
                id: 1,
                note_id: 2,
                is_public: false,
                invitation_hash: "abcdefghij".to_string(),
                custom_hostname: Some("notes.example.com".to_string()),
                cover: None,
            },
            team: vec![],
        };
        let json: serde_json::Value = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["noteId"], 2);
        assert_eq!(json["isPublic"], false);
        assert_eq!(json["customHostname"], "notes.example.com");
        assert!(json["team"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_stored_file_data_not_serialized() {
        let file = StoredFile {
            id: 1,
            key: "k1".to_string(),
            kind: FileKind::NoteAttachment,
            note_id: Some(9),
            uploader_id: 3,
            filename: "diagram.png".to_string(),
            data: vec![1, 2, 3],
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&file).unwrap();
        assert!(!json.contains("data"));
        assert!(json.contains(r#""filename":"diagram.png""#));
    }

    #[test]
    fn test_patch_settings_request_accepts_partial_body() {
        let req: PatchNoteSettingsRequest =
            serde_json::from_str(r#"{"isPublic": false}"#).unwrap();
        assert_eq!(req.is_public, Some(false));
        assert!(req.custom_hostname.is_none());
        assert!(req.cover.is_none());
    }
}

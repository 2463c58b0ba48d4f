//! List entries - validated whitelist/blacklist submissions.
//!
//! Drafts carry raw client input exactly as deserialized from JSON; the
//! `Entry` variants only ever hold normalized data (required text trimmed,
//! optionals defaulted). Invalid drafts never become entries.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Which list a submission targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Whitelist,
    Blacklist,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Whitelist => write!(f, "whitelist"),
            Self::Blacklist => write!(f, "blacklist"),
        }
    }
}

/// A validated whitelist entry: where a game's saves live and how to back
/// them up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhitelistEntry {
    pub game_name: String,
    pub save_path: String,
    pub mod_path: String,
    pub add_path: String,
    pub special_backup_mark: i64,
}

/// A validated blacklist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlacklistEntry {
    pub game_name: String,
}

/// Raw whitelist submission body, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhitelistDraft {
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub save_path: String,
    #[serde(default)]
    pub mod_path: Option<String>,
    #[serde(default)]
    pub add_path: Option<String>,
    #[serde(default)]
    pub special_backup_mark: Option<i64>,
}

/// Raw blacklist submission body, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlacklistDraft {
    #[serde(default)]
    pub game_name: String,
}

impl WhitelistEntry {
    /// Validate and normalize a raw submission.
    pub fn from_draft(draft: WhitelistDraft) -> Result<Self, DomainError> {
        let game_name = required_text("gameName", &draft.game_name)?;
        let save_path = required_text("savePath", &draft.save_path)?;
        let special_backup_mark = draft.special_backup_mark.unwrap_or(0);
        if special_backup_mark < 0 {
            return Err(DomainError::validation(
                "specialBackupMark must be a non-negative integer",
            ));
        }

        Ok(Self {
            game_name,
            save_path,
            mod_path: draft.mod_path.unwrap_or_default(),
            add_path: draft.add_path.unwrap_or_default(),
            special_backup_mark,
        })
    }
}

impl BlacklistEntry {
    /// Validate and normalize a raw submission.
    pub fn from_draft(draft: BlacklistDraft) -> Result<Self, DomainError> {
        Ok(Self {
            game_name: required_text("gameName", &draft.game_name)?,
        })
    }
}

/// Payload of a moderation request, tagged by the list it targets.
///
/// Serialized untagged: the pending listing and the moderation channel both
/// show the entry fields directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    Whitelist(WhitelistEntry),
    Blacklist(BlacklistEntry),
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Whitelist(_) => EntryKind::Whitelist,
            Self::Blacklist(_) => EntryKind::Blacklist,
        }
    }

    pub fn game_name(&self) -> &str {
        match self {
            Self::Whitelist(entry) => &entry.game_name,
            Self::Blacklist(entry) => &entry.game_name,
        }
    }
}

fn required_text(field: &'static str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!(
            "{field} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whitelist_draft(game_name: &str, save_path: &str) -> WhitelistDraft {
        WhitelistDraft {
            game_name: game_name.to_string(),
            save_path: save_path.to_string(),
            ..WhitelistDraft::default()
        }
    }

    #[test]
    fn whitelist_defaults_optionals() {
        let entry = WhitelistEntry::from_draft(whitelist_draft("Foo", "/s"))
            .expect("minimal draft is valid");
        assert_eq!(entry.game_name, "Foo");
        assert_eq!(entry.save_path, "/s");
        assert_eq!(entry.mod_path, "");
        assert_eq!(entry.add_path, "");
        assert_eq!(entry.special_backup_mark, 0);
    }

    #[test]
    fn whitelist_trims_required_fields() {
        let entry = WhitelistEntry::from_draft(whitelist_draft("  Foo  ", " /saves "))
            .expect("whitespace-padded draft is valid");
        assert_eq!(entry.game_name, "Foo");
        assert_eq!(entry.save_path, "/saves");
    }

    #[test]
    fn whitelist_rejects_empty_game_name() {
        let err = WhitelistEntry::from_draft(whitelist_draft("", "/s"))
            .expect_err("empty gameName must fail");
        assert_eq!(
            err,
            DomainError::Validation("gameName must not be empty".to_string())
        );
    }

    #[test]
    fn whitelist_rejects_blank_save_path() {
        let err = WhitelistEntry::from_draft(whitelist_draft("Foo", "   "))
            .expect_err("blank savePath must fail");
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("savePath")));
    }

    #[test]
    fn whitelist_rejects_negative_backup_mark() {
        let draft = WhitelistDraft {
            special_backup_mark: Some(-1),
            ..whitelist_draft("Foo", "/s")
        };
        let err = WhitelistEntry::from_draft(draft).expect_err("negative mark must fail");
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("specialBackupMark")));
    }

    #[test]
    fn blacklist_requires_game_name() {
        assert!(BlacklistEntry::from_draft(BlacklistDraft::default()).is_err());

        let entry = BlacklistEntry::from_draft(BlacklistDraft {
            game_name: "Cheater".to_string(),
        })
        .expect("named draft is valid");
        assert_eq!(entry.game_name, "Cheater");
    }

    #[test]
    fn draft_deserializes_camel_case() {
        let draft: WhitelistDraft = serde_json::from_str(
            r#"{"gameName":"Foo","savePath":"/s","modPath":"/m","specialBackupMark":2}"#,
        )
        .expect("camelCase body deserializes");
        let entry = WhitelistEntry::from_draft(draft).expect("valid");
        assert_eq!(entry.mod_path, "/m");
        assert_eq!(entry.add_path, "");
        assert_eq!(entry.special_backup_mark, 2);
    }

    #[test]
    fn draft_accepts_null_optionals() {
        let draft: WhitelistDraft = serde_json::from_str(
            r#"{"gameName":"Foo","savePath":"/s","modPath":null,"specialBackupMark":null}"#,
        )
        .expect("nulls deserialize as absent");
        let entry = WhitelistEntry::from_draft(draft).expect("valid");
        assert_eq!(entry.mod_path, "");
        assert_eq!(entry.special_backup_mark, 0);
    }

    #[test]
    fn entry_serializes_payload_fields_directly() {
        let entry = Entry::Blacklist(BlacklistEntry {
            game_name: "Cheater".to_string(),
        });
        let json = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(json, serde_json::json!({"gameName": "Cheater"}));
    }
}

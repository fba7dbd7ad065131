use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use uuid::Uuid;

/// A vault item as printed by `bw get item` and `bw list items`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Always `"item"`.
    pub object: String,
    #[allow(missing_docs)]
    pub id: Uuid,
    /// `None` for items in the personal vault.
    #[serde(default)]
    pub organization_id: Option<Uuid>,
    #[serde(default)]
    #[allow(missing_docs)]
    pub folder_id: Option<Uuid>,
    #[allow(missing_docs)]
    pub r#type: CipherType,
    /// Older CLI versions omit this.
    #[serde(default)]
    pub reprompt: CipherRepromptType,
    #[allow(missing_docs)]
    pub name: String,
    #[serde(default)]
    #[allow(missing_docs)]
    pub notes: Option<String>,
    #[allow(missing_docs)]
    pub favorite: bool,
    /// Custom fields, in the order they were defined.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fields: Vec<Field>,
    /// Only present on [CipherType::Login] items.
    #[serde(default)]
    pub login: Option<Login>,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[allow(missing_docs)]
    pub collection_ids: Vec<Uuid>,
    #[allow(missing_docs)]
    pub revision_date: DateTime<Utc>,
    #[serde(default)]
    #[allow(missing_docs)]
    pub creation_date: Option<DateTime<Utc>>,
    /// Set when the item is in the trash.
    #[serde(default)]
    pub deleted_date: Option<DateTime<Utc>>,
}

impl Item {
    /// First custom field called `name`.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name.as_deref() == Some(name))
    }

    #[allow(missing_docs)]
    pub fn is_deleted(&self) -> bool {
        self.deleted_date.is_some()
    }
}

/// Integer `type` code of an [Item].
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(from = "u8", into = "u8")]
pub enum CipherType {
    #[allow(missing_docs)]
    Login,
    #[allow(missing_docs)]
    SecureNote,
    #[allow(missing_docs)]
    Card,
    #[allow(missing_docs)]
    Identity,
    #[allow(missing_docs)]
    SshKey,
    /// A code newer than this crate, kept as is.
    Other(u8),
}

impl From<u8> for CipherType {
    fn from(value: u8) -> Self {
        match value {
            1 => CipherType::Login,
            2 => CipherType::SecureNote,
            3 => CipherType::Card,
            4 => CipherType::Identity,
            5 => CipherType::SshKey,
            other => CipherType::Other(other),
        }
    }
}

impl From<CipherType> for u8 {
    fn from(value: CipherType) -> Self {
        match value {
            CipherType::Login => 1,
            CipherType::SecureNote => 2,
            CipherType::Card => 3,
            CipherType::Identity => 4,
            CipherType::SshKey => 5,
            CipherType::Other(code) => code,
        }
    }
}

/// Whether the master password must be re-entered before showing the item.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(from = "u8", into = "u8")]
pub enum CipherRepromptType {
    #[default]
    #[allow(missing_docs)]
    None,
    #[allow(missing_docs)]
    Password,
    /// A code newer than this crate, kept as is.
    Other(u8),
}

impl From<u8> for CipherRepromptType {
    fn from(value: u8) -> Self {
        match value {
            0 => CipherRepromptType::None,
            1 => CipherRepromptType::Password,
            other => CipherRepromptType::Other(other),
        }
    }
}

impl From<CipherRepromptType> for u8 {
    fn from(value: CipherRepromptType) -> Self {
        match value {
            CipherRepromptType::None => 0,
            CipherRepromptType::Password => 1,
            CipherRepromptType::Other(code) => code,
        }
    }
}

/// A custom field on an [Item].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(default)]
    #[allow(missing_docs)]
    pub name: Option<String>,
    #[serde(default)]
    #[allow(missing_docs)]
    pub value: Option<String>,
    #[allow(missing_docs)]
    pub r#type: FieldType,
    /// Which login/card/identity property a [FieldType::Linked] field points at.
    #[serde(default)]
    pub linked_id: Option<u32>,
}

/// Represents the type of a [Field].
#[derive(Clone, Copy, Serialize_repr, Deserialize_repr, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FieldType {
    /// Text field
    Text = 0,
    /// Hidden text field
    Hidden = 1,
    /// Boolean field
    Boolean = 2,
    /// Linked field
    Linked = 3,
}

#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Login {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub uris: Vec<LoginUri>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// TOTP secret or `otpauth://` URI.
    #[serde(default)]
    pub totp: Option<String>,
    #[serde(default)]
    pub password_revision_date: Option<DateTime<Utc>>,
}

#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginUri {
    /// `None` means the account-wide default match detection applies.
    #[serde(default)]
    pub r#match: Option<UriMatchType>,
    #[serde(default)]
    pub uri: Option<String>,
}

#[allow(missing_docs)]
#[derive(Clone, Copy, Serialize_repr, Deserialize_repr, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum UriMatchType {
    Domain = 0,
    Host = 1,
    StartsWith = 2,
    Exact = 3,
    RegularExpression = 4,
    Never = 5,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

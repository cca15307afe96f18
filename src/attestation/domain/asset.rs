//! Canonical registry assets and the drafts employees declare during
//! attestation.

use super::{
    AssetId, AttestationDomainError, CompanyId, DraftAssetId, EmailAddress, ParseAssetStatusError,
    RecordId, User,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registry asset lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    /// Asset is in service and subject to attestation.
    Active,
    /// Asset has been decommissioned.
    Retired,
}

impl AssetStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Retired => "retired",
        }
    }
}

impl TryFrom<&str> for AssetStatus {
    type Error = ParseAssetStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "retired" => Ok(Self::Retired),
            _ => Err(ParseAssetStatusError(value.to_owned())),
        }
    }
}

/// Descriptive attributes shared by drafts and canonical assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDetails {
    /// Asset category, e.g. `laptop` or `monitor`.
    pub kind: String,
    /// Manufacturer name.
    pub make: String,
    /// Model designation.
    pub model: String,
    /// Unique manufacturer serial number.
    pub serial_number: String,
    /// Internal inventory tag, when labelled.
    pub asset_tag: Option<String>,
    /// Owning company, when tracked.
    pub company_id: Option<CompanyId>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Identity attached to a canonical asset at transfer time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetOwner {
    /// Owner's email address.
    pub email: EmailAddress,
    /// Owner's first name.
    pub first_name: String,
    /// Owner's last name.
    pub last_name: String,
    /// Owner's manager, when known.
    pub manager_email: Option<EmailAddress>,
}

impl AssetOwner {
    /// Builds owner identity from a registered user.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            email: user.email().clone(),
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().to_owned(),
            manager_email: user.manager_email().cloned(),
        }
    }
}

/// An asset declared by an employee during attestation, not yet part of the
/// canonical registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftAsset {
    id: DraftAssetId,
    record_id: RecordId,
    details: AssetDetails,
}

impl DraftAsset {
    /// Creates a draft attached to an attestation record.
    ///
    /// # Errors
    ///
    /// Returns [`AttestationDomainError::EmptySerialNumber`] when the serial
    /// number is blank.
    pub fn new(record_id: RecordId, details: AssetDetails) -> Result<Self, AttestationDomainError> {
        if details.serial_number.trim().is_empty() {
            return Err(AttestationDomainError::EmptySerialNumber);
        }
        Ok(Self {
            id: DraftAssetId::new(),
            record_id,
            details,
        })
    }

    /// Reconstructs a draft from persisted storage.
    #[must_use]
    pub const fn from_persisted(id: DraftAssetId, record_id: RecordId, details: AssetDetails) -> Self {
        Self {
            id,
            record_id,
            details,
        }
    }

    /// Returns the draft identifier.
    #[must_use]
    pub const fn id(&self) -> DraftAssetId {
        self.id
    }

    /// Returns the owning attestation record.
    #[must_use]
    pub const fn record_id(&self) -> RecordId {
        self.record_id
    }

    /// Returns the declared asset attributes.
    #[must_use]
    pub const fn details(&self) -> &AssetDetails {
        &self.details
    }

    /// Builds the canonical insertion row for this draft.
    ///
    /// The promoted asset carries the draft's attributes, the resolved owner
    /// identity, and starts in active status.
    #[must_use]
    pub fn promote(&self, owner: AssetOwner) -> NewAsset {
        NewAsset {
            details: self.details.clone(),
            owner,
            status: AssetStatus::Active,
        }
    }
}

/// Insertion row for a canonical registry asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAsset {
    /// Asset attributes.
    pub details: AssetDetails,
    /// Owner identity.
    pub owner: AssetOwner,
    /// Initial lifecycle status.
    pub status: AssetStatus,
}

/// Canonical registry asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    id: AssetId,
    details: AssetDetails,
    owner: AssetOwner,
    status: AssetStatus,
    created_at: DateTime<Utc>,
}

impl Asset {
    /// Materialises an insertion row into a stored asset.
    #[must_use]
    pub fn from_new(row: NewAsset, at: DateTime<Utc>) -> Self {
        Self {
            id: AssetId::new(),
            details: row.details,
            owner: row.owner,
            status: row.status,
            created_at: at,
        }
    }

    /// Reconstructs an asset from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: AssetId,
        details: AssetDetails,
        owner: AssetOwner,
        status: AssetStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            details,
            owner,
            status,
            created_at,
        }
    }

    /// Returns the asset identifier.
    #[must_use]
    pub const fn id(&self) -> AssetId {
        self.id
    }

    /// Returns the asset attributes.
    #[must_use]
    pub const fn details(&self) -> &AssetDetails {
        &self.details
    }

    /// Returns the owner identity.
    #[must_use]
    pub const fn owner(&self) -> &AssetOwner {
        &self.owner
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> AssetStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

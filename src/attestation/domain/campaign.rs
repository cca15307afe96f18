//! Campaign aggregate root and campaign lifecycle types.

use super::{AttestationDomainError, CampaignId, ParseCampaignStatusError, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Campaign lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    /// Campaign is running and drives scheduled notifications.
    Active,
    /// Campaign has ended, either by expiry or by admin action. Terminal.
    Completed,
}

impl CampaignStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for CampaignStatus {
    type Error = ParseCampaignStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseCampaignStatusError(value.to_owned())),
        }
    }
}

/// Day thresholds after campaign start at which scheduled notifications fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationThresholds {
    /// Days after start before registered users receive a reminder.
    pub reminder_days: u32,
    /// Days after start before managers receive an escalation.
    pub escalation_days: u32,
    /// Days after start before unregistered asset owners receive a reminder.
    pub unregistered_reminder_days: u32,
}

/// Parameter object for creating a new campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCampaign {
    /// Human-readable campaign name.
    pub name: String,
    /// Free-form campaign description.
    pub description: String,
    /// Instant the campaign window opens.
    pub start_date: DateTime<Utc>,
    /// Instant the campaign window closes, when bounded.
    pub end_date: Option<DateTime<Utc>>,
    /// Notification day thresholds.
    pub thresholds: NotificationThresholds,
    /// Administrator who created the campaign.
    pub created_by: UserId,
}

/// Campaign aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    id: CampaignId,
    name: String,
    description: String,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    thresholds: NotificationThresholds,
    status: CampaignStatus,
    created_by: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCampaignData {
    /// Persisted campaign identifier.
    pub id: CampaignId,
    /// Persisted campaign name.
    pub name: String,
    /// Persisted campaign description.
    pub description: String,
    /// Persisted window start.
    pub start_date: DateTime<Utc>,
    /// Persisted window end, if bounded.
    pub end_date: Option<DateTime<Utc>>,
    /// Persisted notification thresholds.
    pub thresholds: NotificationThresholds,
    /// Persisted lifecycle status.
    pub status: CampaignStatus,
    /// Persisted creator reference.
    pub created_by: UserId,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    /// Creates a new active campaign.
    ///
    /// # Errors
    ///
    /// Returns [`AttestationDomainError::EmptyCampaignName`] when the name is
    /// blank and [`AttestationDomainError::EndDateBeforeStart`] when a bounded
    /// window would close before it opens.
    pub fn create(params: NewCampaign, clock: &impl Clock) -> Result<Self, AttestationDomainError> {
        let name = params.name.trim().to_owned();
        if name.is_empty() {
            return Err(AttestationDomainError::EmptyCampaignName);
        }
        if let Some(end) = params.end_date
            && end <= params.start_date
        {
            return Err(AttestationDomainError::EndDateBeforeStart);
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: CampaignId::new(),
            name,
            description: params.description,
            start_date: params.start_date,
            end_date: params.end_date,
            thresholds: params.thresholds,
            status: CampaignStatus::Active,
            created_by: params.created_by,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a campaign from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCampaignData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            start_date: data.start_date,
            end_date: data.end_date,
            thresholds: data.thresholds,
            status: data.status,
            created_by: data.created_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the campaign identifier.
    #[must_use]
    pub const fn id(&self) -> CampaignId {
        self.id
    }

    /// Returns the campaign name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the campaign description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the window start.
    #[must_use]
    pub const fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    /// Returns the window end, if bounded.
    #[must_use]
    pub const fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    /// Returns the notification day thresholds.
    #[must_use]
    pub const fn thresholds(&self) -> NotificationThresholds {
        self.thresholds
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> CampaignStatus {
        self.status
    }

    /// Returns the creator reference.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reports whether the campaign is still running.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, CampaignStatus::Active)
    }

    /// Reports whether a bounded campaign window has passed at `now`.
    ///
    /// Unbounded campaigns never expire.
    #[must_use]
    pub fn expired_at(&self, now: DateTime<Utc>) -> bool {
        self.end_date.is_some_and(|end| now > end)
    }

    /// Transitions the campaign to its terminal completed state.
    ///
    /// # Errors
    ///
    /// Returns [`AttestationDomainError::CampaignAlreadyCompleted`] when the
    /// campaign has already ended.
    pub fn complete(&mut self, at: DateTime<Utc>) -> Result<(), AttestationDomainError> {
        if !self.is_active() {
            return Err(AttestationDomainError::CampaignAlreadyCompleted);
        }
        self.status = CampaignStatus::Completed;
        self.updated_at = at;
        Ok(())
    }
}

//! Event — something users can register for, owned by its creator.

use serde::{Deserialize, Serialize};

use crate::error::{EventHubError, ValidationError};
use crate::id::{EventId, UserId};
use crate::time::{self, Timestamp};

/// A persisted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: String,
    pub location: String,
    #[serde(rename = "dateTime")]
    pub date_time: Timestamp,
    /// The creator. Only this user may update or delete the event.
    ///
    /// Nullable in storage: rows written by older tooling may have no owner,
    /// in which case nobody can modify them.
    pub user_id: Option<UserId>,
}

impl Event {
    /// Whether `user` is allowed to modify this event.
    #[must_use]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.user_id == Some(user)
    }

    /// The user-editable part of this event.
    #[must_use]
    pub fn details(&self) -> EventDetails {
        EventDetails {
            name: self.name.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            date_time: self.date_time,
        }
    }
}

/// The user-editable fields of an [`Event`], used for creation and
/// full-replacement updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    pub name: String,
    pub description: String,
    pub location: String,
    pub date_time: Timestamp,
}

impl EventDetails {
    /// Create a builder for constructing [`EventDetails`].
    #[must_use]
    pub fn builder() -> EventDetailsBuilder {
        EventDetailsBuilder::default()
    }

    /// Build details from raw request strings, parsing `date_time` as
    /// RFC 3339.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::Validation`] when a field is empty or the
    /// timestamp does not parse.
    pub fn from_raw(
        name: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
        date_time: &str,
    ) -> Result<Self, EventHubError> {
        let builder = Self::builder()
            .name(name)
            .description(description)
            .location(location);
        if date_time.trim().is_empty() {
            return builder.build();
        }
        builder.date_time(time::parse_timestamp(date_time)?).build()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::Validation`] when a string field is blank.
    pub fn validate(&self) -> Result<(), EventHubError> {
        for (field, value) in [
            ("name", &self.name),
            ("description", &self.description),
            ("location", &self.location),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyField(field).into());
            }
        }
        Ok(())
    }
}

/// Step-by-step builder for [`EventDetails`].
#[derive(Debug, Default)]
pub struct EventDetailsBuilder {
    name: Option<String>,
    description: Option<String>,
    location: Option<String>,
    date_time: Option<Timestamp>,
}

impl EventDetailsBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn date_time(mut self, date_time: Timestamp) -> Self {
        self.date_time = Some(date_time);
        self
    }

    /// Consume the builder, validate, and return [`EventDetails`].
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::Validation`] if a string field is missing or
    /// blank, or if no timestamp was given.
    pub fn build(self) -> Result<EventDetails, EventHubError> {
        let details = EventDetails {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            date_time: self.date_time.unwrap_or_default(),
        };
        details.validate()?;
        if self.date_time.is_none() {
            return Err(ValidationError::EmptyField("dateTime").into());
        }
        Ok(details)
    }
}

/// What happens to an event's registrations when the event is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Remove the registrations together with the event.
    #[default]
    Cascade,
    /// Refuse to delete an event that still has registrations.
    Reject,
}

impl std::str::FromStr for DeletePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cascade" => Ok(Self::Cascade),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown delete policy `{other}`")),
        }
    }
}

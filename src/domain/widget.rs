//! Dashboard widget entity - a structural team-scoped resource
//!
//! Creation and every mutation of kind, position, activation or title are
//! structural operations; only the config payload is a content field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::storage::{StorageEntity, StorageKey};
use super::team::TeamId;
use super::DomainError;

/// Widget identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(Uuid);

impl WidgetId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::invalid_id(format!("'{}' is not a valid widget id", value)))
    }
}

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for WidgetId {
    fn encode(&self) -> String {
        self.0.to_string()
    }
}

/// Kind of dashboard widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Chart,
    Counter,
    List,
}

impl std::fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Chart => write!(f, "chart"),
            Self::Counter => write!(f, "counter"),
            Self::List => write!(f, "list"),
        }
    }
}

/// Widget entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Widget {
    id: WidgetId,
    team_id: TeamId,
    title: String,
    kind: WidgetKind,
    position: i32,
    active: bool,
    /// Content payload, opaque to the authorization core
    config: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Widget {
    pub fn new(
        team_id: TeamId,
        title: impl Into<String>,
        kind: WidgetKind,
        position: i32,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation("Widget title must not be empty"));
        }

        let now = Utc::now();
        Ok(Self {
            id: WidgetId::generate(),
            team_id,
            title,
            kind,
            position,
            active: true,
            config: Value::Null,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn team_id(&self) -> TeamId {
        self.team_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn config(&self) -> &Value {
        &self.config
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Structural mutators

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), DomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation("Widget title must not be empty"));
        }
        self.title = title;
        self.touch();
        Ok(())
    }

    pub fn set_kind(&mut self, kind: WidgetKind) {
        self.kind = kind;
        self.touch();
    }

    pub fn set_position(&mut self, position: i32) {
        self.position = position;
        self.touch();
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.touch();
    }

    // Content mutator

    pub fn set_config(&mut self, config: Value) {
        self.config = config;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl StorageEntity for Widget {
    type Key = WidgetId;

    fn key(&self) -> WidgetId {
        self.id
    }
}

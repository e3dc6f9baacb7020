//! Widget service - team-scoped structural resource

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::domain::storage::Storage;
use crate::domain::team::TeamId;
use crate::domain::widget::{Widget, WidgetId, WidgetKind};
use crate::domain::DomainError;

/// Request for creating a widget
#[derive(Debug, Clone)]
pub struct CreateWidgetRequest {
    pub title: String,
    pub kind: WidgetKind,
    pub position: i32,
}

/// Partial update of a widget
#[derive(Debug, Clone, Default)]
pub struct UpdateWidgetRequest {
    pub title: Option<String>,
    pub kind: Option<WidgetKind>,
    pub position: Option<i32>,
    pub active: Option<bool>,
    pub config: Option<Value>,
}

impl UpdateWidgetRequest {
    /// True if the update touches type, position, activation or title
    pub fn is_structural(&self) -> bool {
        self.title.is_some()
            || self.kind.is_some()
            || self.position.is_some()
            || self.active.is_some()
    }
}

/// Widget service
#[derive(Debug)]
pub struct WidgetService {
    storage: Arc<dyn Storage<Widget>>,
}

impl WidgetService {
    pub fn new(storage: Arc<dyn Storage<Widget>>) -> Self {
        Self { storage }
    }

    /// List the team's widgets ordered by position
    pub async fn list(&self, team_id: &TeamId) -> Result<Vec<Widget>, DomainError> {
        let mut widgets: Vec<Widget> = self
            .storage
            .list()
            .await?
            .into_iter()
            .filter(|w| w.team_id() == *team_id)
            .collect();
        widgets.sort_by_key(|w| w.position());
        Ok(widgets)
    }

    /// Create a widget in the team
    pub async fn create(
        &self,
        team_id: TeamId,
        request: CreateWidgetRequest,
    ) -> Result<Widget, DomainError> {
        info!(team_id = %team_id, kind = %request.kind, "Creating widget");

        let widget = Widget::new(team_id, request.title, request.kind, request.position)?;
        self.storage.create(widget).await
    }

    /// Get a widget within the team
    pub async fn get(&self, team_id: &TeamId, id: &WidgetId) -> Result<Widget, DomainError> {
        self.storage
            .get(id)
            .await?
            .filter(|w| w.team_id() == *team_id)
            .ok_or_else(|| DomainError::not_found(format!("Widget '{}' not found", id)))
    }

    /// Apply a partial update within the team
    pub async fn update(
        &self,
        team_id: &TeamId,
        id: &WidgetId,
        request: UpdateWidgetRequest,
    ) -> Result<Widget, DomainError> {
        info!(team_id = %team_id, widget_id = %id, "Updating widget");

        let mut widget = self.get(team_id, id).await?;

        if let Some(title) = request.title {
            widget.set_title(title)?;
        }
        if let Some(kind) = request.kind {
            widget.set_kind(kind);
        }
        if let Some(position) = request.position {
            widget.set_position(position);
        }
        if let Some(active) = request.active {
            widget.set_active(active);
        }
        if let Some(config) = request.config {
            widget.set_config(config);
        }

        self.storage.update(widget).await
    }

    /// Delete a widget within the team
    pub async fn delete(&self, team_id: &TeamId, id: &WidgetId) -> Result<(), DomainError> {
        info!(team_id = %team_id, widget_id = %id, "Deleting widget");

        self.get(team_id, id).await?;
        self.storage.delete(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryStorage;
    use serde_json::json;

    fn service() -> WidgetService {
        WidgetService::new(Arc::new(InMemoryStorage::<Widget>::new()))
    }

    fn request(position: i32) -> CreateWidgetRequest {
        CreateWidgetRequest {
            title: "Velocity".to_string(),
            kind: WidgetKind::Chart,
            position,
        }
    }

    #[tokio::test]
    async fn test_list_ordered_by_position() {
        let service = service();
        let team_id = TeamId::generate();

        service.create(team_id, request(2)).await.unwrap();
        service.create(team_id, request(0)).await.unwrap();

        let widgets = service.list(&team_id).await.unwrap();
        assert_eq!(widgets[0].position(), 0);
        assert_eq!(widgets[1].position(), 2);
    }

    #[tokio::test]
    async fn test_list_is_team_scoped() {
        let service = service();
        let team_id = TeamId::generate();

        service.create(team_id, request(0)).await.unwrap();
        service
            .create(TeamId::generate(), request(0))
            .await
            .unwrap();

        assert_eq!(service.list(&team_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_config_only() {
        let service = service();
        let team_id = TeamId::generate();
        let widget = service.create(team_id, request(0)).await.unwrap();

        let updated = service
            .update(
                &team_id,
                &widget.id(),
                UpdateWidgetRequest {
                    config: Some(json!({"interval": "7d"})),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.config(), &json!({"interval": "7d"}));
        assert_eq!(updated.kind(), WidgetKind::Chart);
    }

    #[tokio::test]
    async fn test_foreign_team_widget_reads_as_missing() {
        let service = service();
        let widget = service
            .create(TeamId::generate(), request(0))
            .await
            .unwrap();

        let result = service.get(&TeamId::generate(), &widget.id()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[test]
    fn test_structural_detection() {
        assert!(UpdateWidgetRequest {
            position: Some(1),
            ..Default::default()
        }
        .is_structural());
        assert!(UpdateWidgetRequest {
            active: Some(false),
            ..Default::default()
        }
        .is_structural());
        assert!(!UpdateWidgetRequest {
            config: Some(json!({})),
            ..Default::default()
        }
        .is_structural());
    }
}

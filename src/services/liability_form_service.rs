use crate::documents::{self, FormDocument, LiabilityFormData, RenderFormat, RenderedDocument};
use crate::error::{AppError, AppResult};
use crate::models::{FormType, LiabilityForm};
use crate::repositories::{EventRepository, LiabilityFormRepository, ParticipantRepository};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Collection and rendering of liability forms
pub struct LiabilityFormService {
    event_repo: Arc<EventRepository>,
    participant_repo: Arc<ParticipantRepository>,
    form_repo: Arc<LiabilityFormRepository>,
}

impl LiabilityFormService {
    pub fn new(
        event_repo: Arc<EventRepository>,
        participant_repo: Arc<ParticipantRepository>,
        form_repo: Arc<LiabilityFormRepository>,
    ) -> Self {
        Self {
            event_repo,
            participant_repo,
            form_repo,
        }
    }

    /// Validate and store a submission
    pub async fn submit(
        &self,
        event_id: Uuid,
        participant_id: Option<Uuid>,
        form_type: FormType,
        data: LiabilityFormData,
    ) -> AppResult<LiabilityForm> {
        documents::validate(form_type, &data)?;

        if self.event_repo.find_by_id(event_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Event {} not found", event_id)));
        }
        if let Some(participant_id) = participant_id {
            if self
                .participant_repo
                .find_in_event(participant_id, event_id)
                .await?
                .is_none()
            {
                return Err(AppError::NotFound(format!(
                    "Participant {} not found in event {}",
                    participant_id, event_id
                )));
            }
        }

        let payload = serde_json::to_value(&data)?;
        let form = self
            .form_repo
            .create(event_id, participant_id, form_type, &payload)
            .await?;
        info!(
            "Liability form submitted: event={}, id={}, type={}",
            event_id,
            form.id,
            form_type.as_str()
        );
        Ok(form)
    }

    pub async fn get(&self, form_id: Uuid) -> AppResult<LiabilityForm> {
        self.form_repo
            .find_by_id(form_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Liability form {} not found", form_id)))
    }

    /// Lay out a stored form
    pub async fn document(&self, form_id: Uuid) -> AppResult<FormDocument> {
        let form = self.get(form_id).await?;
        let form_type = form.form_type_enum().map_err(AppError::Message)?;
        let data: LiabilityFormData = serde_json::from_value(form.data)?;
        Ok(documents::build_document(form_type, &data)?)
    }

    /// Lay out and render a stored form
    pub async fn render(&self, form_id: Uuid, format: RenderFormat) -> AppResult<RenderedDocument> {
        let document = self.document(form_id).await?;
        let renderer = format.renderer();
        Ok(documents::render_document(renderer.as_ref(), &document)?)
    }
}

use super::session::TemplateSession;
use crate::config::TemplateConfig;
use crate::error::TemplateError;
use crate::types::JavaTypeSystem;
use naviscope_api::models::{PlaceholderId, PositionContext, RenderedBuffer};
use naviscope_api::semantic::CompletionProvider;
use naviscope_api::template::TemplateService;
use naviscope_api::{ApiError, ApiResult};
use std::sync::Arc;

/// Editor-facing template service. Owns at most one live session.
pub struct TemplateEngine {
    type_system: Arc<dyn JavaTypeSystem>,
    completion: Arc<dyn CompletionProvider>,
    config: Arc<TemplateConfig>,
    session: Option<TemplateSession>,
}

impl TemplateEngine {
    pub fn new(
        type_system: Arc<dyn JavaTypeSystem>,
        completion: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self::with_config(type_system, completion, TemplateConfig::default())
    }

    pub fn with_config(
        type_system: Arc<dyn JavaTypeSystem>,
        completion: Arc<dyn CompletionProvider>,
        config: TemplateConfig,
    ) -> Self {
        Self {
            type_system,
            completion,
            config: Arc::new(config),
            session: None,
        }
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    /// The live session, if an expansion is in progress.
    pub fn session(&self) -> Option<&TemplateSession> {
        self.session.as_ref()
    }

    fn session_mut(&mut self) -> ApiResult<&mut TemplateSession> {
        self.session.as_mut().ok_or(ApiError::NoActiveSession)
    }

    pub fn edit(&mut self, placeholder: PlaceholderId, text: &str) -> ApiResult<RenderedBuffer> {
        Ok(self.session_mut()?.edit(placeholder, text)?)
    }

    /// Finish the live expansion and return its text.
    pub fn accept(&mut self) -> ApiResult<String> {
        let mut session = self.session.take().ok_or(ApiError::NoActiveSession)?;
        Ok(session.accept()?)
    }

    pub fn cancel(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.cancel();
        }
    }
}

impl TemplateService for TemplateEngine {
    fn resolve_placeholders(
        &mut self,
        template: &str,
        position: &PositionContext,
    ) -> ApiResult<RenderedBuffer> {
        self.cancel();

        let mut session = TemplateSession::new(
            template,
            position.clone(),
            self.type_system.clone(),
            self.completion.clone(),
            self.config.clone(),
        )
        .inspect_err(|e| tracing::warn!("Cannot expand template: {}", e))?;

        let buffer = session.resolve()?;
        self.session = Some(session);
        Ok(buffer)
    }

    fn select_choice(
        &mut self,
        placeholder: PlaceholderId,
        choice: usize,
    ) -> ApiResult<RenderedBuffer> {
        self.session_mut()?
            .select_choice(placeholder, choice)
            .map_err(|e: TemplateError| e.into())
    }
}

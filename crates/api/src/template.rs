use crate::error::ApiResult;
use crate::models::{PlaceholderId, PositionContext, RenderedBuffer};

/// Template expansion service exposed to the editor.
///
/// One expansion is live at a time: `resolve_placeholders` starts a new one
/// (discarding the previous), `select_choice` cycles a placeholder of the
/// live expansion and re-renders it.
pub trait TemplateService {
    /// Expand `template` at `position` and render every placeholder.
    fn resolve_placeholders(
        &mut self,
        template: &str,
        position: &PositionContext,
    ) -> ApiResult<RenderedBuffer>;

    /// Make `choice` the active value of `placeholder`, updating its dependents.
    fn select_choice(&mut self, placeholder: PlaceholderId, choice: usize)
    -> ApiResult<RenderedBuffer>;
}

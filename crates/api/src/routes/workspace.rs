//! Route definitions for `/workspace`, the funnel currently being built.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::workspace;
use crate::state::AppState;

/// Routes mounted at `/workspace`.
///
/// ```text
/// GET    /                                   -> snapshot
/// POST   /new                                -> create_new
/// POST   /save                               -> save_current
/// PATCH  /details                            -> update_details
/// POST   /preview                            -> toggle_preview
/// POST   /template                           -> apply_template
///
/// PUT    /elements                           -> replace_elements
/// POST   /elements                           -> add_element
/// POST   /elements/reorder                   -> drop_element
/// POST   /elements/move                      -> move_element
/// PATCH  /elements/{element_id}              -> update_element
/// DELETE /elements/{element_id}              -> delete_element
///
/// POST   /elements/{element_id}/edit         -> begin_edit
/// PUT    /elements/{element_id}/edit         -> set_edit_buffer
/// DELETE /elements/{element_id}/edit         -> cancel_edit
/// POST   /elements/{element_id}/edit/toggle  -> toggle_edit
/// POST   /elements/{element_id}/edit/commit  -> commit_edit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(workspace::snapshot))
        .route("/new", post(workspace::create_new))
        .route("/save", post(workspace::save_current))
        .route("/details", patch(workspace::update_details))
        .route("/preview", post(workspace::toggle_preview))
        .route("/template", post(workspace::apply_template))
        .route(
            "/elements",
            post(workspace::add_element).put(workspace::replace_elements),
        )
        .route("/elements/reorder", post(workspace::drop_element))
        .route("/elements/move", post(workspace::move_element))
        .route(
            "/elements/{element_id}",
            patch(workspace::update_element).delete(workspace::delete_element),
        )
        .route(
            "/elements/{element_id}/edit",
            post(workspace::begin_edit)
                .put(workspace::set_edit_buffer)
                .delete(workspace::cancel_edit),
        )
        .route("/elements/{element_id}/edit/toggle", post(workspace::toggle_edit))
        .route("/elements/{element_id}/edit/commit", post(workspace::commit_edit))
}

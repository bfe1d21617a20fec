mod app_context;
mod workspace_root;

pub use app_context::AppContext;
pub use workspace_root::resolve_workspace_root;

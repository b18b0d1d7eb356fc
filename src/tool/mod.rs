//! Caller-facing surfaces over the pipeline: the search tool an assistant invokes and
//! the health report.

pub mod health;
pub mod search;


pub use health::{
    ComponentStatus, EnvironmentHealth, HealthComponents, HealthReport, HealthStatus,
    SearchEngineHealth,
};
pub use search::{
    MAX_RENDERED_RESULTS, MIN_RENDERED_CHARS, NO_RELEVANT_INFO, RESULT_SEPARATOR, SEARCH_TOOL_NAME,
    SEARCH_TOOL_TOP_K, SearchTool, ToolOutcome, ToolOutput, render_results,
};

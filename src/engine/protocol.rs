use crate::model::content::ModuleContent;
use crate::model::module::{ModuleType, ThemeDef};

/// Everything the worker needs for one generation. `session_id` ties the
/// eventual reply back to the session that asked for it, so replies for
/// abandoned sessions are dropped.
#[derive(Debug, Clone)]
pub struct GenerateJob {
    pub session_id: u64,
    pub api_key: Option<String>,
    pub age: u8,
    pub module: ModuleType,
    pub theme: Option<ThemeDef>,
    pub difficulty: u8,
}

pub enum EngineCommand {
    GenerateModule(GenerateJob),
}

pub enum EngineResponse {
    ModuleReady {
        session_id: u64,
        content: ModuleContent,
    },
    ModuleFailed {
        session_id: u64,
        /// Child-friendly text; the specific cause is already logged.
        message: String,
    },
}

use std::sync::mpsc::{Receiver, Sender};

use tracing::{error, info};

use crate::engine::content_decode::decode_module_content;
use crate::engine::error::ContentError;
use crate::engine::gemini::ContentFetcher;
use crate::engine::prompt_builder::build_prompt;
use crate::engine::protocol::{EngineCommand, EngineResponse, GenerateJob};
use crate::model::content::ModuleContent;

/// Background worker that owns the generation pipeline. Commands arrive
/// over a channel and are handled one at a time, so at most one network
/// request is ever in flight.
pub struct Engine<F: ContentFetcher> {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    fetcher: F,
}

impl<F: ContentFetcher> Engine<F> {
    pub fn new(rx: Receiver<EngineCommand>, tx: Sender<EngineResponse>, fetcher: F) -> Self {
        Self { rx, tx, fetcher }
    }

    pub fn run(&mut self) {
        while let Ok(cmd) = self.rx.recv() {
            match cmd {
                EngineCommand::GenerateModule(job) => {
                    info!(module = ?job.module, age = job.age, "generating module content");
                    let reply = match run_job(&job, &self.fetcher) {
                        Ok(content) => EngineResponse::ModuleReady {
                            session_id: job.session_id,
                            content,
                        },
                        Err(err) => {
                            error!(module = ?job.module, %err, "module generation failed");
                            EngineResponse::ModuleFailed {
                                session_id: job.session_id,
                                message: err.child_message().to_string(),
                            }
                        }
                    };
                    // The UI side may already be gone during shutdown.
                    let _ = self.tx.send(reply);
                }
            }
        }
    }
}

/// The pipeline for one request: prompt -> fetch -> decode.
pub fn run_job(
    job: &GenerateJob,
    fetcher: &impl ContentFetcher,
) -> Result<ModuleContent, ContentError> {
    let prompt = build_prompt(job.age, job.module, job.theme.as_ref(), job.difficulty);
    if prompt.is_empty() {
        return Err(ContentError::ModuleUnavailable);
    }
    let api_key = job
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or(ContentError::MissingApiKey)?;
    let raw = fetcher.fetch(api_key, &prompt)?;
    decode_module_content(&raw, job.module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::module::ModuleType;

    struct CannedFetcher {
        reply: Result<String, ContentError>,
    }

    impl ContentFetcher for CannedFetcher {
        fn fetch(&self, _api_key: &str, prompt: &str) -> Result<String, ContentError> {
            assert!(!prompt.is_empty());
            self.reply.clone()
        }
    }

    fn job(module: ModuleType, age: u8, api_key: Option<&str>) -> GenerateJob {
        GenerateJob {
            session_id: 1,
            api_key: api_key.map(String::from),
            age,
            module,
            theme: None,
            difficulty: 3,
        }
    }

    #[test]
    fn full_pipeline_produces_typed_content() {
        let fetcher = CannedFetcher {
            reply: Ok(r###"{"story":"## Brainy Math! 🧠","questions":[{"question":"4 x 5 = ?","options":["18","20","9","24"],"answer":1}]}"###.into()),
        };
        let content = run_job(&job(ModuleType::Math, 8, Some("key")), &fetcher).unwrap();
        assert_eq!(content.item_count(), 1);
    }

    #[test]
    fn missing_api_key_short_circuits_before_the_network() {
        struct PanicFetcher;
        impl ContentFetcher for PanicFetcher {
            fn fetch(&self, _: &str, _: &str) -> Result<String, ContentError> {
                panic!("should not be called");
            }
        }
        let err = run_job(&job(ModuleType::Math, 8, None), &PanicFetcher).unwrap_err();
        assert!(matches!(err, ContentError::MissingApiKey));
        let err = run_job(&job(ModuleType::Math, 8, Some("  ")), &PanicFetcher).unwrap_err();
        assert!(matches!(err, ContentError::MissingApiKey));
    }

    #[test]
    fn unavailable_module_is_reported_without_a_request() {
        // Spelling opens at age 10.
        let fetcher = CannedFetcher {
            reply: Ok(String::new()),
        };
        let err = run_job(&job(ModuleType::Spelling, 6, Some("key")), &fetcher).unwrap_err();
        assert!(matches!(err, ContentError::ModuleUnavailable));
    }

    #[test]
    fn transport_failures_pass_through() {
        let fetcher = CannedFetcher {
            reply: Err(ContentError::Transport("connection refused".into())),
        };
        let err = run_job(&job(ModuleType::Math, 8, Some("key")), &fetcher).unwrap_err();
        assert!(matches!(err, ContentError::Transport(_)));
    }
}

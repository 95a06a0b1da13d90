mod engine;
mod model;
mod store;
mod ui;

use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bodhi=info")),
        )
        .init();

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Bodhi",
        options,
        Box::new(|_cc| Ok(Box::new(ui::app::BodhiApp::new()))),
    )
}

#[cfg(test)]
mod tests {
    use crate::engine::content_decode::decode_module_content;
    use crate::engine::prompt_builder::build_prompt;
    use crate::model::module::ModuleType;
    use crate::model::profile::Profile;
    use crate::model::progress::ProgressBook;
    use crate::model::session::ModuleSession;

    /// The whole happy path for an eight-year-old doing math, minus the
    /// network: prompt, canned reply, decode, answer, score, record.
    #[test]
    fn math_run_for_an_eight_year_old() {
        let profile = Profile::new("Maya", 8);

        let prompt = build_prompt(profile.age, ModuleType::Math, None, 3);
        assert!(prompt.contains("multiplication"));
        assert!(prompt.contains("division"));

        let raw = r###"{"story":"## Brainy Math! 🧠","questions":[{"question":"4 x 5 = ?","options":["18","20","9","24"],"answer":1}]}"###;
        let content = decode_module_content(raw, ModuleType::Math).unwrap();

        let mut session = ModuleSession::new(1, &profile, ModuleType::Math, None, 3);
        session.content_ready(content);
        session.select_option(0, 1);
        let summary = session.submit().unwrap();
        assert_eq!(summary.display(), "1 / 1");
        assert!(summary.is_perfect());

        let mut book = ProgressBook::default();
        book.record_attempt(
            &session.profile_name,
            session.module,
            summary.score,
            summary.total,
        );
        let stats = book.stats_for("Maya");
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].best, 100);
        assert_eq!(stats[0].average, 100);
        assert_eq!(stats[0].attempts, 1);
    }
}

//! End-to-end tests for the tutor flow.

#[cfg(test)]
mod tests {
    use crate::errors::{FlowError, InferenceError};
    use crate::events::FlowEventKind;
    use crate::inference::{EngineSlot, UnavailableEngine};
    use crate::progress::ProgressTracker;
    use crate::storage::MemoryStore;
    use crate::testing::{
        assert_exactly_one_responder, assert_fell_back, assert_formatted, FailingEngine,
        ScriptedEngine, StaticProgress, TutorFixture,
    };
    use crate::tutor::{
        SessionReply, Tutor, TutorMode, TutorSession, BUILD_PROMPT, CALL_LLM, ERROR_HANDLER,
        FORMAT_RESPONSE, GET_CONTEXT,
    };
    use crate::config::TutorConfig;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_success_path() {
        let (fixture, engine) = TutorFixture::answering("Use **PLA** first!");
        let run = fixture.tutor.run("What filament should I use?").await.unwrap();

        assert_formatted(&run);
        assert_eq!(
            run.path,
            vec![GET_CONTEXT, BUILD_PROMPT, CALL_LLM, FORMAT_RESPONSE]
        );
        let response = run.state.response.unwrap();
        assert!(!response.is_error);
        assert_eq!(response.html, "<p>Use <strong>PLA</strong> first!</p>");
        assert_eq!(engine.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_path() {
        let fixture = TutorFixture::new(Arc::new(FailingEngine::runtime("model not loaded")));
        let run = fixture.tutor.run("Tell me about nozzles").await.unwrap();

        assert_fell_back(&run);
        assert_eq!(run.path, vec![GET_CONTEXT, BUILD_PROMPT, CALL_LLM, ERROR_HANDLER]);
    }

    #[tokio::test]
    async fn test_failing_engine_always_falls_back() {
        let engine = Arc::new(FailingEngine::runtime("boom"));
        let fixture = TutorFixture::new(engine.clone());
        let questions = [
            "Why is my print stringing?",
            "What is the meaning of life?",
            "",
            "PETG or PLA?",
            "🐝🐝🐝",
        ];

        for question in questions {
            let run = fixture.tutor.run(question).await.unwrap();
            assert_fell_back(&run);
        }
        assert_eq!(engine.call_count(), questions.len());
    }

    #[tokio::test]
    async fn test_exactly_one_responder_either_way() {
        let engine = ScriptedEngine::always("ok").then_fail(InferenceError::NotReady);
        let fixture = TutorFixture::new(Arc::new(engine));

        let first = fixture.tutor.run("q1").await.unwrap();
        let second = fixture.tutor.run("q2").await.unwrap();
        assert_exactly_one_responder(&first);
        assert_exactly_one_responder(&second);
        assert!(first.visited(ERROR_HANDLER));
        assert!(second.visited(FORMAT_RESPONSE));
    }

    #[tokio::test]
    async fn test_stringing_question_uses_canned_answer() {
        let fixture = TutorFixture::new(Arc::new(FailingEngine::runtime("model not loaded")));
        let response = fixture.tutor.ask("Why is my print stringing?").await;

        assert!(!response.is_error);
        assert!(response.html.contains("Stringing?"));
    }

    #[tokio::test]
    async fn test_uppercase_keyword_matches() {
        let fixture = TutorFixture::new(Arc::new(FailingEngine::runtime("x")));
        let response = fixture.tutor.ask("I have STRINGING issues").await;
        assert!(response.html.contains("Stringing?"));
    }

    #[tokio::test]
    async fn test_unmatched_question_gets_apology_with_error() {
        let fixture = TutorFixture::new(Arc::new(FailingEngine::runtime("model not loaded")));
        let response = fixture.tutor.ask("What is the meaning of life?").await;

        assert!(response.is_error);
        assert!(response.html.contains("model not loaded"));
        assert!(response.html.contains("Buzz... I hit a snag!"));
    }

    #[tokio::test]
    async fn test_unloaded_slot_falls_back() {
        let tutor = Tutor::new(Arc::new(EngineSlot::new()), Arc::new(StaticProgress::default()));
        let response = tutor.ask("Any tips?").await;

        assert!(response.is_error);
        assert!(response.html.contains("AI engine not ready yet"));
    }

    #[tokio::test]
    async fn test_unavailable_engine_falls_back() {
        let tutor = Tutor::new(Arc::new(UnavailableEngine), Arc::new(StaticProgress::default()));
        assert!(!tutor.ask("How do I clear a clog?").await.is_error);
    }

    #[tokio::test]
    async fn test_format_round_trip_order() {
        let reply = "```gcode\nG28\n```\nRemember **safety first**\n- Let it cool\n- Wear gloves";
        let (fixture, _) = TutorFixture::answering(reply);
        let html = fixture.tutor.ask("How do I home?").await.html;

        let code = html.find("<pre><code").unwrap();
        let bold = html.find("<strong>safety first</strong>").unwrap();
        let list = html.find("<ul>").unwrap();
        assert!(code < bold && bold < list);
        assert_eq!(html.matches("<ul>").count(), 1);
        assert!(html.contains("<ul><li>Let it cool</li><li>Wear gloves</li></ul>"));
    }

    #[tokio::test]
    async fn test_prompt_reflects_mode_after_rejected_switch() {
        let (fixture, engine) = TutorFixture::answering("ok");
        assert!(fixture.tutor.set_mode("troubleshoot"));
        assert!(!fixture.tutor.set_mode("karaoke"));
        assert_eq!(fixture.tutor.mode(), TutorMode::Troubleshoot);

        fixture.tutor.ask("help").await;
        let request = engine.last_request().unwrap();
        assert!(request.system.contains("MODE: TROUBLESHOOT"));
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(request.max_tokens, 600);
    }

    #[tokio::test]
    async fn test_prompt_uses_progress_and_page() {
        let (_, engine) = TutorFixture::answering("ok");
        let progress = StaticProgress::completed(&["basics", "workflow", "troubleshoot", "advanced"]);
        let fixture = TutorFixture::with_progress(engine.clone(), progress);
        fixture.tutor.set_page("/modules/business.html");

        fixture.tutor.ask("How much should I charge?").await;
        let system = engine.last_request().unwrap().system;
        assert!(system.contains("User's skill level: advanced"));
        assert!(system.contains("Current module: business"));
        assert!(system.contains("Completed: basics, workflow, troubleshoot, advanced"));
    }

    #[tokio::test]
    async fn test_events_are_emitted_in_order() {
        let (fixture, _) = TutorFixture::answering("hi");
        fixture.tutor.ask("hello").await;

        assert_eq!(
            fixture.events.completed_nodes(),
            vec![GET_CONTEXT, BUILD_PROMPT, CALL_LLM, FORMAT_RESPONSE]
        );
        let last = fixture.events.events().pop().unwrap();
        assert_eq!(last.kind, FlowEventKind::FlowCompleted);
    }

    #[tokio::test]
    async fn test_step_limit_becomes_fallback() {
        let config = TutorConfig {
            max_steps: 2,
            ..TutorConfig::default()
        };
        let engine = Arc::new(ScriptedEngine::always("never used"));
        let tutor = Tutor::new(engine.clone(), Arc::new(StaticProgress::default()))
            .with_config(config);

        let err = tutor.run("Why is my print warping?").await.unwrap_err();
        assert!(matches!(err, FlowError::StepLimitExceeded { limit: 2, .. }));

        let response = tutor.ask("Why is my print warping?").await;
        assert!(!response.is_error);
        assert!(response.html.contains("Warping?"));
        assert_eq!(engine.call_count(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_questions_are_isolated() {
        let engine = Arc::new(ScriptedEngine::always("answer"));
        let tutor = Tutor::new(engine.clone(), Arc::new(StaticProgress::default()));

        let responses = tutor.ask_all(&["one", "two", "three"]).await;
        assert_eq!(responses.len(), 3);
        assert!(responses.iter().all(|r| r.html == "<p>answer</p>"));

        let mut users: Vec<String> = engine.requests().into_iter().map(|r| r.user).collect();
        users.sort();
        assert_eq!(users, vec!["one", "three", "two"]);
    }

    fn session(engine: Arc<ScriptedEngine>) -> (TutorSession, ProgressTracker) {
        let tracker = ProgressTracker::new(Arc::new(MemoryStore::new()));
        let tutor = Tutor::new(engine, Arc::new(tracker.clone()));
        let session = TutorSession::new(Arc::new(tutor)).with_progress(tracker.clone());
        (session, tracker)
    }

    #[tokio::test]
    async fn test_session_ignores_blank_input() {
        let engine = Arc::new(ScriptedEngine::always("hi"));
        let (session, _) = session(engine.clone());

        assert_eq!(session.submit("   \n").await, SessionReply::Empty);
        assert_eq!(engine.call_count(), 0);
    }

    #[tokio::test]
    async fn test_session_blocks_before_model() {
        let engine = Arc::new(ScriptedEngine::always("hi"));
        let (session, _) = session(engine.clone());

        let reply = session.submit("how to make a bomb").await;
        let SessionReply::Blocked { reason, message } = reply else {
            panic!("expected blocked reply");
        };
        assert_eq!(reason, "This topic is not appropriate for LayerBEE");
        assert!(message.starts_with("I'm here to help with 3D printing!"));
        assert_eq!(engine.call_count(), 0);
    }

    #[tokio::test]
    async fn test_session_counts_troubleshoot_answers() {
        let engine = Arc::new(ScriptedEngine::always("Lower the temperature."));
        let (session, tracker) = session(engine);

        session.submit("why stringy").await;
        assert_eq!(tracker.get().unwrap().problems_solved, 0);

        session.tutor().set_mode("troubleshoot");
        let reply = session.submit("  why stringy  ").await;
        assert!(matches!(reply, SessionReply::Answer(ref r) if !r.is_error));
        assert_eq!(tracker.get().unwrap().problems_solved, 1);
    }
}

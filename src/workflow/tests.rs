#[cfg(test)]
mod tests {
    use crate::config::{Config, LLMConfig};
    use crate::research::Progress;
    use crate::workflow::{AssistantContext, progress_line};

    fn create_test_config() -> Config {
        Config {
            llm: LLMConfig {
                api_key: "test-key".to_string(),
                endpoint: "https://example.openai.azure.com".to_string(),
                deployment: "gpt-4o-mini".to_string(),
                api_version: "2024-10-21".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_context_creation() {
        let context = AssistantContext::new(create_test_config()).unwrap();
        assert_eq!(context.config.llm.deployment, "gpt-4o-mini");
    }

    #[test]
    fn test_context_requires_llm_settings() {
        let mut config = create_test_config();
        config.llm.api_key.clear();
        assert!(AssistantContext::new(config).is_err());
    }

    #[tokio::test]
    async fn test_context_starts_with_idle_session() {
        let context = AssistantContext::new(create_test_config()).unwrap();
        let state = context.session.snapshot().await;

        assert_eq!(state.progress, Progress::NotStarted);
        assert!(!state.research_started);
        assert!(state.facts.is_empty());
    }

    #[test]
    fn test_progress_lines() {
        assert_eq!(
            progress_line(Progress::PlanReady),
            "[ 25%] 📋 Research plan ready"
        );
        assert_eq!(
            progress_line(Progress::Complete),
            "[100%] ✅ Research complete"
        );
    }
}

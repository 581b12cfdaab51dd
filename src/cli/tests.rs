#[cfg(test)]
mod tests {
    use crate::cli::{Args, RunMode};
    use crate::config::LLMProvider;
    use clap::Parser;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_args_default_values() {
        let args = Args::try_parse_from(["research-assistant"]).unwrap();

        assert!(args.config.is_none());
        assert!(args.bind.is_none());
        assert!(args.topic.is_none());
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert!(!args.verbose);
        assert_eq!(args.run_mode(), RunMode::Serve);
    }

    #[test]
    fn test_args_short_options() {
        let args = Args::try_parse_from([
            "research-assistant",
            "-b",
            "0.0.0.0:9000",
            "-t",
            "quantum sensors",
            "-o",
            "/tmp/reports",
            "-v",
        ])
        .unwrap();

        assert_eq!(args.bind, Some("0.0.0.0:9000".to_string()));
        assert!(args.verbose);
        assert_eq!(
            args.run_mode(),
            RunMode::Headless {
                topic: "quantum sensors".to_string(),
                output_dir: PathBuf::from("/tmp/reports"),
            }
        );
    }

    #[test]
    fn test_args_llm_options() {
        let args = Args::try_parse_from([
            "research-assistant",
            "--provider",
            "openai",
            "--api-key",
            "test-key",
            "--endpoint",
            "https://api.openai.com/v1",
            "--deployment",
            "gpt-4o",
            "--api-version",
            "2024-10-21",
            "--temperature",
            "0.3",
            "--max-turns",
            "4",
        ])
        .unwrap();

        assert_eq!(args.provider, Some("openai".to_string()));
        assert_eq!(args.api_key, Some("test-key".to_string()));
        assert_eq!(args.endpoint, Some("https://api.openai.com/v1".to_string()));
        assert_eq!(args.deployment, Some("gpt-4o".to_string()));
        assert_eq!(args.api_version, Some("2024-10-21".to_string()));
        assert_eq!(args.temperature, Some(0.3));
        assert_eq!(args.max_turns, Some(4));
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("research-assistant.toml");
        std::fs::write(
            &config_path,
            r#"
[llm]
provider = "azure"
deployment = "file-deployment"
max_turns = 3

[research]
pacing_delay_ms = 1500
"#,
        )
        .unwrap();

        let args = Args::try_parse_from([
            "research-assistant",
            "--config",
            config_path.to_str().unwrap(),
            "--provider",
            "openai",
            "--deployment",
            "cli-deployment",
            "--temperature",
            "0.5",
        ])
        .unwrap();
        let config = args.into_config().unwrap();

        assert_eq!(config.llm.provider, LLMProvider::OpenAI);
        assert_eq!(config.llm.deployment, "cli-deployment");
        assert_eq!(config.llm.temperature, Some(0.5));
        // 命令行未指定的项保留文件中的值
        assert_eq!(config.llm.max_turns, 3);
        assert_eq!(config.research.pacing_delay_ms, 1500);
    }

    #[test]
    fn test_verbose_from_config_file_without_flag() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("research-assistant.toml");
        std::fs::write(&config_path, "verbose = true\n").unwrap();

        let args = Args::try_parse_from([
            "research-assistant",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();

        assert!(!args.verbose);
        assert!(args.into_config().unwrap().verbose);
    }

    #[test]
    fn test_unknown_provider_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("empty.toml");
        std::fs::write(&config_path, "").unwrap();

        let args = Args::try_parse_from([
            "research-assistant",
            "--config",
            config_path.to_str().unwrap(),
            "--provider",
            "bedrock",
        ])
        .unwrap();

        assert!(args.into_config().is_err());
    }

    #[test]
    fn test_explicit_missing_config_file_is_an_error() {
        let args = Args::try_parse_from([
            "research-assistant",
            "--config",
            "/definitely/not/here.toml",
        ])
        .unwrap();

        assert!(args.into_config().is_err());
    }

    #[test]
    fn test_invalid_max_turns_is_rejected_by_clap() {
        let result = Args::try_parse_from(["research-assistant", "--max-turns", "many"]);
        assert!(result.is_err());
    }
}

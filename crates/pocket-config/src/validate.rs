use crate::config::Config;
use crate::error::ConfigError;

const MAX_HISTORY_ROWS: u16 = 1000;

/// Check every range constraint, returning all violations at once.
pub fn validate(config: &Config) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut reject = |field: &str, message: String| {
        errors.push(ConfigError::Validation {
            field: field.to_string(),
            message,
        });
    };

    let term = &config.terminal;
    if !(2..=255).contains(&term.cols) {
        reject("terminal.cols", format!("must be 2-255, got {}", term.cols));
    }
    if term.screen_rows == 0 {
        reject("terminal.screen_rows", "must be at least 1".to_string());
    }
    if term.history_rows < term.screen_rows || term.history_rows > MAX_HISTORY_ROWS {
        reject(
            "terminal.history_rows",
            format!(
                "must be between screen_rows ({}) and {}, got {}",
                term.screen_rows, MAX_HISTORY_ROWS, term.history_rows
            ),
        );
    }
    if term.term_type.trim().is_empty() {
        reject("terminal.term_type", "must not be empty".to_string());
    }
    if config.display.full_refresh_every == 0 {
        reject("display.full_refresh_every", "must be at least 1".to_string());
    }
    if config.session.command.trim().is_empty() {
        reject("session.command", "must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(cfg: &Config) -> Vec<String> {
        validate(cfg)
            .unwrap_err()
            .into_iter()
            .map(|e| match e {
                ConfigError::Validation { field, .. } => field,
                other => panic!("unexpected error: {other}"),
            })
            .collect()
    }

    #[test]
    fn valid_default_config_passes() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn cols_out_of_range() {
        let mut cfg = Config::default();
        cfg.terminal.cols = 1;
        assert_eq!(fields(&cfg), vec!["terminal.cols"]);
        cfg.terminal.cols = 256;
        assert_eq!(fields(&cfg), vec!["terminal.cols"]);
    }

    #[test]
    fn zero_screen_rows_rejected() {
        let mut cfg = Config::default();
        cfg.terminal.screen_rows = 0;
        assert_eq!(fields(&cfg), vec!["terminal.screen_rows"]);
    }

    #[test]
    fn history_shorter_than_screen_rejected() {
        let mut cfg = Config::default();
        cfg.terminal.history_rows = 10;
        assert_eq!(fields(&cfg), vec!["terminal.history_rows"]);
    }

    #[test]
    fn history_too_long_rejected() {
        let mut cfg = Config::default();
        cfg.terminal.history_rows = 1001;
        assert_eq!(fields(&cfg), vec!["terminal.history_rows"]);
    }

    #[test]
    fn history_equal_to_screen_allowed() {
        let mut cfg = Config::default();
        cfg.terminal.history_rows = cfg.terminal.screen_rows;
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn empty_strings_rejected() {
        let mut cfg = Config::default();
        cfg.terminal.term_type = " ".into();
        cfg.session.command = String::new();
        assert_eq!(fields(&cfg), vec!["terminal.term_type", "session.command"]);
    }

    #[test]
    fn multiple_errors_returned() {
        let mut cfg = Config::default();
        cfg.terminal.cols = 0;
        cfg.display.full_refresh_every = 0;
        cfg.terminal.history_rows = 5000;
        assert_eq!(validate(&cfg).unwrap_err().len(), 3);
    }
}

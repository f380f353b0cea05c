//! Retry wrapper for text generation.

use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::domain::GenerationError;
use crate::domain::config::GatewayConfig;
use crate::ports::TextGenerator;

const MAX_DELAY_MS: u64 = 10_000;
const RETRY_AFTER_TOKEN: &str = "retry_after_ms=";
const MAX_LOG_ERROR_CHARS: usize = 512;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay_ms: u64,
}

impl RetryPolicy {
    /// At most one retry, whatever the configuration asks for.
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self { max_attempts: config.max_attempts.clamp(1, 2), delay_ms: config.retry_delay_ms }
    }

    fn delay_for_retry(&self, error: &GenerationError) -> Duration {
        let delay_ms = extract_retry_after_ms(error).unwrap_or(self.delay_ms);
        Duration::from_millis(delay_ms.min(MAX_DELAY_MS))
    }
}

pub struct RetryingTextGenerator {
    inner: Box<dyn TextGenerator>,
    policy: RetryPolicy,
}

impl RetryingTextGenerator {
    pub fn new(inner: Box<dyn TextGenerator>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl TextGenerator for RetryingTextGenerator {
    fn generate(&self, instruction: &str) -> Result<String, GenerationError> {
        if instruction.trim().is_empty() {
            return Err(GenerationError::EmptyInstruction);
        }

        let mut attempt = 1;
        loop {
            match self.inner.generate(instruction) {
                Ok(text) => return Ok(text),
                Err(error) => {
                    if !error.is_transient() || attempt >= self.policy.max_attempts {
                        return Err(error);
                    }

                    let delay = self.policy.delay_for_retry(&error);
                    warn!(
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %format_error_for_log(&error),
                        "generation failed, retrying"
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
            }
        }
    }
}

fn extract_retry_after_ms(error: &GenerationError) -> Option<u64> {
    let GenerationError::GenerationUnavailable { message, .. } = error else {
        return None;
    };

    let start = message.find(RETRY_AFTER_TOKEN)? + RETRY_AFTER_TOKEN.len();
    let digits: String =
        message[start..].chars().take_while(|ch| ch.is_ascii_digit()).collect();
    digits.parse::<u64>().ok()
}

pub(crate) fn format_error_for_log(error: &GenerationError) -> String {
    match error {
        GenerationError::GenerationUnavailable { message, status } => {
            let sanitized = sanitize_and_truncate_for_log(message);
            match status {
                Some(code) => format!("GenerationUnavailable(status={}): {}", code, sanitized),
                None => format!("GenerationUnavailable: {}", sanitized),
            }
        }
        _ => sanitize_and_truncate_for_log(&error.to_string()),
    }
}

fn sanitize_and_truncate_for_log(input: &str) -> String {
    let mut output = String::new();

    for (count, ch) in input.chars().enumerate() {
        if count >= MAX_LOG_ERROR_CHARS {
            break;
        }
        output.push(if ch.is_control() { ' ' } else { ch });
    }

    let mut compact = output.split_whitespace().collect::<Vec<_>>().join(" ");
    if input.chars().count() > MAX_LOG_ERROR_CHARS {
        compact.push_str(" [truncated]");
    }
    compact.trim().to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct SequenceGenerator {
        attempts: AtomicUsize,
        responses: Mutex<Vec<Result<String, GenerationError>>>,
    }

    impl SequenceGenerator {
        fn new(responses: Vec<Result<String, GenerationError>>) -> Self {
            Self { attempts: AtomicUsize::new(0), responses: Mutex::new(responses) }
        }
    }

    impl TextGenerator for std::sync::Arc<SequenceGenerator> {
        fn generate(&self, _instruction: &str) -> Result<String, GenerationError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            let mut guard = self.responses.lock().expect("responses lock poisoned");
            if guard.is_empty() {
                return Err(GenerationError::unavailable("test: unexpected extra call", Some(500)));
            }
            guard.remove(0)
        }
    }

    fn retrying(
        responses: Vec<Result<String, GenerationError>>,
        max_attempts: u32,
    ) -> (RetryingTextGenerator, std::sync::Arc<SequenceGenerator>) {
        let inner = std::sync::Arc::new(SequenceGenerator::new(responses));
        let policy = RetryPolicy { max_attempts, delay_ms: 1 };
        (RetryingTextGenerator::new(Box::new(inner.clone()), policy), inner)
    }

    #[test]
    fn retries_once_and_succeeds() {
        let (generator, inner) = retrying(
            vec![Err(GenerationError::unavailable("server error", Some(500))), Ok("plan".into())],
            2,
        );

        assert_eq!(generator.generate("instruction").unwrap(), "plan");
        assert_eq!(inner.attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn gives_up_after_one_retry() {
        let (generator, inner) = retrying(
            vec![
                Err(GenerationError::unavailable("timed out", None)),
                Err(GenerationError::unavailable("timed out", None)),
                Ok("never reached".into()),
            ],
            2,
        );

        let err = generator.generate("instruction").unwrap_err();
        assert!(matches!(err, GenerationError::GenerationUnavailable { status: None, .. }));
        assert_eq!(inner.attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn does_not_retry_rejections() {
        let (generator, inner) =
            retrying(vec![Err(GenerationError::unavailable("invalid request", Some(400)))], 2);

        let err = generator.generate("instruction").unwrap_err();
        assert_eq!(err, GenerationError::unavailable("invalid request", Some(400)));
        assert_eq!(inner.attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_instruction_never_reaches_inner() {
        let (generator, inner) = retrying(vec![Ok("plan".into())], 2);

        assert_eq!(generator.generate(""), Err(GenerationError::EmptyInstruction));
        assert_eq!(inner.attempts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn policy_caps_attempts_at_two() {
        let config = GatewayConfig { max_attempts: 5, ..GatewayConfig::default() };
        assert_eq!(RetryPolicy::from_config(&config).max_attempts, 2);
    }

    #[test]
    fn retry_after_overrides_configured_delay() {
        let policy = RetryPolicy { max_attempts: 2, delay_ms: 500 };
        let err = GenerationError::unavailable("Rate limited (retry_after_ms=1500)", Some(429));
        assert_eq!(policy.delay_for_retry(&err), Duration::from_millis(1500));
    }

    #[test]
    fn log_format_sanitizes_control_characters() {
        let err = GenerationError::unavailable("bad\nerror\twith\rcontrols", Some(500));
        let formatted = format_error_for_log(&err);
        assert!(formatted.contains("GenerationUnavailable(status=500):"));
        assert!(!formatted.contains('\n'));
        assert!(!formatted.contains('\r'));
    }
}

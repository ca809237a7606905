//! Turning recognition replies into the text the player reads.
//!
//! Everything here is pure so the display strings and the early-win rule can
//! be pinned down by native tests.

use crate::api::{ModelInfo, RecognizeResponse};

/// A live guess only ends a running round when the backend says it is correct
/// AND reports at least this confidence. The final (time-up) verdict trusts
/// `is_correct` alone.
pub const EARLY_WIN_CONFIDENCE: f64 = 0.5;

#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    Guess {
        prediction: String,
        confidence: f64,
        correct: bool,
    },
    /// The service answered but produced no usable guess.
    Service(String),
}

pub fn interpret(resp: &RecognizeResponse) -> Verdict {
    if let Some(err) = &resp.error {
        return Verdict::Service(err.clone());
    }
    match &resp.prediction {
        Some(prediction) => Verdict::Guess {
            prediction: prediction.clone(),
            confidence: resp.confidence.unwrap_or(0.0),
            correct: resp.is_correct,
        },
        None => Verdict::Service(
            resp.message
                .clone()
                .unwrap_or_else(|| "the model returned no prediction".into()),
        ),
    }
}

/// Whether a guess should stop a round that is still running.
pub fn ends_round_early(v: &Verdict) -> bool {
    matches!(
        v,
        Verdict::Guess {
            correct: true,
            confidence,
            ..
        } if *confidence >= EARLY_WIN_CONFIDENCE
    )
}

pub fn headline(v: &Verdict, expected: &str) -> String {
    match v {
        Verdict::Guess {
            prediction,
            confidence,
            correct,
        } => {
            let pct = format_percent(*confidence);
            if *correct {
                format!("The model sees \"{prediction}\" ({pct}) — that's it!")
            } else {
                format!("The model sees \"{prediction}\" ({pct}) — it expected \"{expected}\".")
            }
        }
        Verdict::Service(msg) => msg.clone(),
    }
}

/// Per-class confidence line, only when the backend reports both classes.
pub fn breakdown(resp: &RecognizeResponse) -> Option<String> {
    let apple = resp.apple_confidence?;
    let banana = resp.banana_confidence?;
    Some(format!(
        "apple {} / banana {}",
        format_percent(apple),
        format_percent(banana)
    ))
}

/// One status line describing the loaded model, for the start screen.
pub fn model_summary(info: &ModelInfo) -> String {
    let mut parts = Vec::new();
    if !info.classes.is_empty() {
        parts.push(format!("classes: {}", info.classes.join(" / ")));
    }
    if let Some(n) = info.total_parameters {
        parts.push(format!("{n} parameters"));
    }
    if parts.is_empty() {
        "Model ready.".into()
    } else {
        format!("Model ready — {}.", parts.join(", "))
    }
}

/// Fraction to one-decimal percent text: `0.873` → `"87.3%"`.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guess(prediction: &str, confidence: f64, correct: bool) -> Verdict {
        Verdict::Guess {
            prediction: prediction.into(),
            confidence,
            correct,
        }
    }

    #[test]
    fn error_field_beats_prediction() {
        let resp = RecognizeResponse {
            prediction: Some("apple".into()),
            error: Some("model not loaded".into()),
            ..Default::default()
        };
        assert_eq!(interpret(&resp), Verdict::Service("model not loaded".into()));
    }

    #[test]
    fn missing_prediction_falls_back_to_message() {
        let resp = RecognizeResponse {
            message: Some("drawing too small".into()),
            ..Default::default()
        };
        assert_eq!(interpret(&resp), Verdict::Service("drawing too small".into()));
    }

    #[test]
    fn early_win_needs_both_correctness_and_confidence() {
        assert!(ends_round_early(&guess("apple", 0.5, true)));
        assert!(ends_round_early(&guess("apple", 0.93, true)));
        assert!(!ends_round_early(&guess("apple", 0.49, true)));
        assert!(!ends_round_early(&guess("banana", 0.99, false)));
        assert!(!ends_round_early(&Verdict::Service("down".into())));
    }

    #[test]
    fn headline_mentions_expectation_only_on_miss() {
        let hit = headline(&guess("apple", 0.873, true), "apple");
        assert_eq!(hit, "The model sees \"apple\" (87.3%) — that's it!");
        let miss = headline(&guess("apple", 0.6, false), "banana");
        assert!(miss.contains("it expected \"banana\""));
    }

    #[test]
    fn breakdown_requires_both_classes() {
        let mut resp = RecognizeResponse {
            apple_confidence: Some(0.8),
            ..Default::default()
        };
        assert_eq!(breakdown(&resp), None);
        resp.banana_confidence = Some(0.2);
        assert_eq!(breakdown(&resp).unwrap(), "apple 80.0% / banana 20.0%");
    }

    #[test]
    fn percent_formatting_rounds_to_one_decimal() {
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(0.8765), "87.7%");
        assert_eq!(format_percent(1.0), "100.0%");
    }
}

//! Module quizzes.
//!
//! Each question takes one answer. Once every question is answered the
//! quiz produces a [`QuizResult`] with a score message.

use crate::errors::{LayerbeeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Question text.
    pub prompt: String,
    /// Answer options in display order.
    pub options: Vec<String>,
    /// Index of the correct option.
    pub correct: usize,
}

impl QuizQuestion {
    /// Creates a question.
    pub fn new<I, S>(prompt: impl Into<String>, options: I, correct: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prompt: prompt.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct,
        }
    }
}

/// Feedback for one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFeedback {
    /// Whether the chosen option was right.
    pub correct: bool,
    /// The right option, shown after a wrong pick.
    pub correct_option: usize,
    /// Set when this answer finished the quiz.
    pub result: Option<QuizResult>,
}

/// Final score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    /// Correct answers.
    pub correct: usize,
    /// Questions in the quiz.
    pub total: usize,
    /// Encouragement for the score.
    pub message: &'static str,
}

/// Picks the message for `correct` out of `total`.
#[must_use]
pub fn score_message(correct: usize, total: usize) -> &'static str {
    let scaled = correct * 100;
    if total > 0 && correct == total {
        "🎉 Perfect score! You really know your 3D printing basics!"
    } else if total > 0 && scaled >= total * 75 {
        "Great job! You've got a solid understanding!"
    } else if total > 0 && scaled >= total * 50 {
        "👍 Good effort! Review the sections above and try again."
    } else {
        "📚 Keep learning! Read through the module again and give it another shot."
    }
}

/// A quiz in progress.
#[derive(Debug, Clone)]
pub struct Quiz {
    questions: Vec<QuizQuestion>,
    answers: BTreeMap<usize, bool>,
}

impl Quiz {
    /// Starts a quiz over `questions`.
    #[must_use]
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            answers: BTreeMap::new(),
        }
    }

    /// The questions.
    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    /// Returns true if `question` already has an answer.
    #[must_use]
    pub fn is_answered(&self, question: usize) -> bool {
        self.answers.contains_key(&question)
    }

    /// Number of correct answers so far.
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.answers.values().filter(|&&ok| ok).count()
    }

    /// Returns true once every question is answered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.questions.is_empty() && self.answers.len() == self.questions.len()
    }

    /// Answers `question` with `option`. Returns `Ok(None)` if the question
    /// was already answered; the first answer stands.
    ///
    /// # Errors
    ///
    /// Fails if the question or option does not exist.
    pub fn answer(&mut self, question: usize, option: usize) -> Result<Option<AnswerFeedback>> {
        let q = self
            .questions
            .get(question)
            .ok_or_else(|| LayerbeeError::NotFound(format!("question {question}")))?;
        if option >= q.options.len() {
            return Err(LayerbeeError::NotFound(format!(
                "option {option} of question {question}"
            )));
        }
        if self.is_answered(question) {
            return Ok(None);
        }

        let correct = option == q.correct;
        let correct_option = q.correct;
        self.answers.insert(question, correct);

        Ok(Some(AnswerFeedback {
            correct,
            correct_option,
            result: self.result(),
        }))
    }

    /// The score, once the quiz is complete.
    #[must_use]
    pub fn result(&self) -> Option<QuizResult> {
        if !self.is_complete() {
            return None;
        }
        let correct = self.correct_count();
        let total = self.questions.len();
        Some(QuizResult {
            correct,
            total,
            message: score_message(correct, total),
        })
    }

    /// Clears every answer for a retake.
    pub fn reset(&mut self) {
        self.answers.clear();
    }
}

use thiserror::Error;

use crate::model::{ids::ArtifactId, year::CorrectYear};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArtifactError {
    #[error("correct answer cannot be empty")]
    EmptyAnswer,

    #[error("artifact needs at least one distractor")]
    NoDistractors,

    #[error("distractor {0:?} repeats the correct answer")]
    DistractorMatchesAnswer(String),

    #[error("year range lower bound {lower} is above upper bound {upper}")]
    InvalidYearRange { lower: i32, upper: i32 },
}

//
// ─── ARTIFACT TYPES ────────────────────────────────────────────────────────────
//

/// Unvalidated artifact fields as they come from a pool file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDraft {
    pub image_ref: String,
    pub correct_answer: String,
    pub distractors: Vec<String>,
    pub correct_year: CorrectYear,
}

impl ArtifactDraft {
    /// Validate the draft and bind it to its pool position.
    ///
    /// Answer and distractor text is trimmed; blank distractors are dropped.
    ///
    /// # Errors
    ///
    /// Returns `ArtifactError` if the answer is blank, no distractor remains,
    /// a distractor equals the answer, or a year range is inverted.
    pub fn validate(self, id: ArtifactId) -> Result<Artifact, ArtifactError> {
        let correct_answer = self.correct_answer.trim().to_owned();
        if correct_answer.is_empty() {
            return Err(ArtifactError::EmptyAnswer);
        }

        let distractors: Vec<String> = self
            .distractors
            .into_iter()
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty())
            .collect();
        if distractors.is_empty() {
            return Err(ArtifactError::NoDistractors);
        }
        if let Some(dup) = distractors.iter().find(|d| **d == correct_answer) {
            return Err(ArtifactError::DistractorMatchesAnswer(dup.clone()));
        }

        if let CorrectYear::Range { lower, upper } = self.correct_year {
            if lower > upper {
                return Err(ArtifactError::InvalidYearRange { lower, upper });
            }
        }

        Ok(Artifact {
            id,
            image_ref: self.image_ref,
            correct_answer,
            distractors,
            correct_year: self.correct_year,
        })
    }
}

/// A quiz artifact: an image to identify and date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    id: ArtifactId,
    image_ref: String,
    correct_answer: String,
    distractors: Vec<String>,
    correct_year: CorrectYear,
}

impl Artifact {
    #[must_use]
    pub fn id(&self) -> ArtifactId {
        self.id
    }

    #[must_use]
    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn distractors(&self) -> &[String] {
        &self.distractors
    }

    #[must_use]
    pub fn correct_year(&self) -> CorrectYear {
        self.correct_year
    }

    /// The correct answer followed by every distractor, unshuffled.
    #[must_use]
    pub fn choices(&self) -> Vec<String> {
        std::iter::once(self.correct_answer.clone())
            .chain(self.distractors.iter().cloned())
            .collect()
    }

    #[must_use]
    pub fn is_correct_answer(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ArtifactDraft {
        ArtifactDraft {
            image_ref: "img/vase.png".into(),
            correct_answer: "Vase".into(),
            distractors: vec!["Urn".into(), "Jug".into()],
            correct_year: CorrectYear::Exact(1200),
        }
    }

    #[test]
    fn valid_draft_keeps_fields() {
        let artifact = draft().validate(ArtifactId::new(3)).unwrap();
        assert_eq!(artifact.id(), ArtifactId::new(3));
        assert_eq!(artifact.image_ref(), "img/vase.png");
        assert_eq!(artifact.choices(), vec!["Vase", "Urn", "Jug"]);
        assert!(artifact.is_correct_answer("Vase"));
        assert!(!artifact.is_correct_answer("Urn"));
    }

    #[test]
    fn blank_answer_is_rejected() {
        let mut d = draft();
        d.correct_answer = "  ".into();
        assert_eq!(
            d.validate(ArtifactId::new(0)).unwrap_err(),
            ArtifactError::EmptyAnswer
        );
    }

    #[test]
    fn blank_distractors_do_not_count() {
        let mut d = draft();
        d.distractors = vec![" ".into()];
        assert_eq!(
            d.validate(ArtifactId::new(0)).unwrap_err(),
            ArtifactError::NoDistractors
        );
    }

    #[test]
    fn distractor_equal_to_answer_is_rejected() {
        let mut d = draft();
        d.distractors.push(" Vase ".into());
        assert!(matches!(
            d.validate(ArtifactId::new(0)).unwrap_err(),
            ArtifactError::DistractorMatchesAnswer(_)
        ));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut d = draft();
        d.correct_year = CorrectYear::Range {
            lower: 1900,
            upper: 1800,
        };
        assert_eq!(
            d.validate(ArtifactId::new(0)).unwrap_err(),
            ArtifactError::InvalidYearRange {
                lower: 1900,
                upper: 1800
            }
        );
    }
}

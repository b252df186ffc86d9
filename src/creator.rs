use thiserror::Error;

pub const SECS_PER_DAY: u64 = 86_400;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("question must not be empty")]
    EmptyQuestion,

    #[error("duration must not be empty")]
    EmptyDuration,

    #[error("duration must be a whole number of days, got {0:?}")]
    BadDuration(String),
}

/// Raw form input. Both fields stay free text until submission.
#[derive(Debug, Default, Clone)]
pub struct CreateForm {
    pub question: String,
    pub duration_days: String,
}

impl CreateForm {
    pub fn new(question: impl Into<String>, duration_days: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            duration_days: duration_days.into(),
        }
    }

    /// Validate and convert. Days become seconds here and nowhere else.
    pub fn parse(&self) -> Result<NewMarket, FormError> {
        let question = self.question.trim();
        if question.is_empty() {
            return Err(FormError::EmptyQuestion);
        }

        let days = self.duration_days.trim();
        if days.is_empty() {
            return Err(FormError::EmptyDuration);
        }
        let days: u64 = days
            .parse()
            .map_err(|_| FormError::BadDuration(days.to_string()))?;
        if days == 0 {
            return Err(FormError::BadDuration(self.duration_days.clone()));
        }
        let duration_secs = days
            .checked_mul(SECS_PER_DAY)
            .ok_or_else(|| FormError::BadDuration(self.duration_days.clone()))?;

        Ok(NewMarket {
            question: question.to_string(),
            duration_secs,
        })
    }
}

/// Validated arguments for createMarket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMarket {
    pub question: String,
    pub duration_secs: u64,
}

/// Submission lifecycle. Submit is refused while a transaction is in
/// flight; success and failure banners persist until the form is next
/// used.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    Pending,
    Succeeded {
        tx_hash: String,
    },
    Failed {
        message: String,
    },
}

impl SubmitState {
    pub fn can_submit(&self) -> bool {
        !matches!(self, SubmitState::Pending)
    }

    pub fn begin(&mut self) {
        *self = SubmitState::Pending;
    }

    pub fn finish(&mut self, outcome: Result<String, String>) {
        *self = match outcome {
            Ok(tx_hash) => SubmitState::Succeeded { tx_hash },
            Err(message) => SubmitState::Failed { message },
        };
    }

    /// Next interaction with the form clears any banner.
    pub fn touch(&mut self) {
        if !matches!(self, SubmitState::Pending) {
            *self = SubmitState::Idle;
        }
    }
}

//! Submission cleaning for birthday entries: first-name normalization,
//! per-field checks, and the denylist rule that turns away famous names.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::countdown::{parse_date, InvalidDate};
use crate::models::birthday::NewBirthday;
use crate::notify::{dispatch_detached, Notification, Notifier};

pub const MAX_NAME_LEN: usize = 20;

pub const FIELD_FIRST_NAME: &str = "firstName";
pub const FIELD_LAST_NAME: &str = "lastName";
pub const FIELD_BIRTHDAY: &str = "birthday";
/// Key for errors that concern the submission as a whole.
pub const FORM_LEVEL: &str = "form";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error(transparent)]
    InvalidDate(#[from] InvalidDate),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Rejected(String),
}

/// Field name -> message, serialized as the `errors` object of a submission response.
pub type FormErrors = BTreeMap<String, String>;

/// Keep only the first whitespace-delimited token.
pub fn normalize_first_name(raw: &str) -> Result<String, FormError> {
    raw.split_whitespace()
        .next()
        .map(str::to_string)
        .ok_or_else(|| FormError::Validation("empty name".into()))
}

fn check_length(value: &str) -> Result<(), FormError> {
    let len = value.chars().count();
    if len > MAX_NAME_LEN {
        return Err(FormError::Validation(format!(
            "must be at most {MAX_NAME_LEN} characters, got {len}"
        )));
    }
    Ok(())
}

/// Settings for the denylist rule and the alert it sends.
#[derive(Debug, Clone)]
pub struct DenylistConfig {
    pub names: HashSet<String>,
    pub rejection_message: String,
    pub notify_subject: String,
    pub notify_from: String,
    pub notify_to: Vec<String>,
    pub notify_timeout: Duration,
}

impl Default for DenylistConfig {
    fn default() -> Self {
        Self {
            names: ["Джон Леннон", "Пол Маккартни", "Джордж Харрисон", "Ринго Старр"]
                .into_iter()
                .map(String::from)
                .collect(),
            rejection_message: "Мы тоже любим Битлз, но введите, пожалуйста, настоящее имя!"
                .into(),
            notify_subject: "Another Beatles member".into(),
            notify_from: "birthday_form@acme.not".into(),
            notify_to: vec!["admin@acme.not".into()],
            notify_timeout: Duration::from_secs(10),
        }
    }
}

/// Rejects denylisted name pairs and alerts the operator when one shows up.
#[derive(Clone)]
pub struct NameGuard {
    config: Arc<DenylistConfig>,
    notifier: Arc<dyn Notifier>,
}

impl NameGuard {
    pub fn new(config: DenylistConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config: Arc::new(config),
            notifier,
        }
    }

    /// `first_name` must already be normalized. A missing last name takes
    /// part in the pair as an empty string.
    ///
    /// The operator alert is spawned on the current Tokio runtime; outside a
    /// runtime it is skipped with a warning and the rejection still stands.
    pub fn check(&self, first_name: &str, last_name: Option<&str>) -> Result<(), FormError> {
        let pair = format!("{first_name} {}", last_name.unwrap_or_default());
        if !self.config.names.contains(&pair) {
            return Ok(());
        }

        tracing::warn!(name = %pair, "Denylisted name submitted, notifying operator");
        dispatch_detached(
            self.notifier.clone(),
            Notification {
                subject: self.config.notify_subject.clone(),
                body: format!("{pair} пытался опубликовать запись!"),
                from: self.config.notify_from.clone(),
                to: self.config.notify_to.clone(),
            },
            self.config.notify_timeout,
        );

        Err(FormError::Rejected(self.config.rejection_message.clone()))
    }
}

/// Raw create/edit submission. Absent and `null` fields both arrive as
/// `None` and are reported by `clean` like any other invalid value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthdayForm {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
}

impl BirthdayForm {
    /// Normalize and validate every field, then apply the denylist.
    /// Field errors are collected together; the denylist only runs once
    /// both names are valid.
    pub fn clean(&self, guard: &NameGuard) -> Result<NewBirthday, FormErrors> {
        let mut errors = FormErrors::new();

        let raw_first = self.first_name.as_deref().unwrap_or_default();
        let first_name = match check_length(raw_first.trim())
            .and_then(|()| normalize_first_name(raw_first))
        {
            Ok(name) => Some(name),
            Err(e) => {
                errors.insert(FIELD_FIRST_NAME.into(), e.to_string());
                None
            }
        };

        let last_name = match self.last_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => match check_length(name) {
                Ok(()) => Some(Some(name.to_string())),
                Err(e) => {
                    errors.insert(FIELD_LAST_NAME.into(), e.to_string());
                    None
                }
            },
            _ => Some(None),
        };

        let birthday = match self.birthday.as_deref().map(parse_date) {
            Some(Ok(date)) => Some(date),
            None => {
                errors.insert(FIELD_BIRTHDAY.into(), "this field is required".into());
                None
            }
            Some(Err(e)) => {
                errors.insert(FIELD_BIRTHDAY.into(), FormError::from(e).to_string());
                None
            }
        };

        if let (Some(first), Some(last)) = (&first_name, &last_name) {
            if let Err(e) = guard.check(first, last.as_deref()) {
                errors.insert(FORM_LEVEL.into(), e.to_string());
            }
        }

        match (first_name, last_name, birthday) {
            (Some(first_name), Some(last_name), Some(birthday)) if errors.is_empty() => {
                Ok(NewBirthday {
                    first_name,
                    last_name,
                    birthday,
                })
            }
            _ => Err(errors),
        }
    }
}

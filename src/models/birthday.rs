use chrono::NaiveDate;
use serde::Serialize;

use crate::countdown::{age_on, days_until_next_birthday, InvalidDate};
use crate::form::FormErrors;

/// Birthday as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Birthday {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub birthday: NaiveDate,
}

/// Cleaned submission, ready to be inserted or written over an existing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBirthday {
    pub first_name: String,
    pub last_name: Option<String>,
    pub birthday: NaiveDate,
}

/// Birthday as returned over the wire, with the values derived from `today`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthdayView {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub birthday: NaiveDate,
    pub countdown_days: i64,
    pub age: u32,
}

impl Birthday {
    pub fn to_view(&self, today: NaiveDate) -> Result<BirthdayView, InvalidDate> {
        Ok(BirthdayView {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            birthday: self.birthday,
            countdown_days: days_until_next_birthday(today, self.birthday)?,
            age: age_on(today, self.birthday),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailResponse {
    pub entry: BirthdayView,
    pub countdown_days: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub errors: FormErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<BirthdayView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown_days: Option<i64>,
}

impl SubmitResponse {
    pub fn accepted(entry: BirthdayView) -> Self {
        Self {
            success: true,
            errors: FormErrors::new(),
            countdown_days: Some(entry.countdown_days),
            entry: Some(entry),
        }
    }

    pub fn invalid(errors: FormErrors) -> Self {
        Self {
            success: false,
            errors,
            entry: None,
            countdown_days: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

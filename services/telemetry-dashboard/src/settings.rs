//! Threshold settings form: load, edit, submit, reflect
//!
//! The form moves Closed -> Open -> (Closed | Open with error). Threshold
//! labels outside the form only ever change after the store accepts a save.
//!
//! Saves may overlap (a double submit, or a reopen while one is in flight).
//! Each save is numbered when issued and an accepted save updates the labels
//! only if no later-issued save has already been applied. A completion only
//! closes or annotates the form it was submitted from.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use serde::Deserialize;

use crate::telemetry_client::TelemetryClient;
use crate::types::{ThresholdSettings, ThresholdSubmission};
use crate::view::{SettingsForm, ViewHandle};
use crate::DashboardError;

/// Shown when a save fails for reasons other than a store rejection
pub const SAVE_RETRY_PROMPT: &str = "Error saving settings. Please try again.";

/// Shown when the current settings cannot be loaded
pub const LOAD_FAILED_NOTICE: &str = "Could not load settings. Please try again.";

/// One of the three editable threshold fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdField {
    Temperature,
    HeartRate,
    Gforce,
}

/// How the operator dismissed the form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    #[default]
    Close,
    Cancel,
    ClickOutside,
}

/// Result of a save attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Accepted; labels updated and the form closed
    Saved(ThresholdSubmission),
    /// Store refused the values; message shown in the form
    Rejected(String),
    /// Transport or protocol failure; retry prompt shown in the form
    Failed,
    /// No form was open
    NotOpen,
    /// Accepted, but a later save had already been applied
    Superseded,
}

/// Synchronizes the edit form and threshold labels with the settings store
#[derive(Debug)]
pub struct SettingsSynchronizer {
    client: Arc<TelemetryClient>,
    view: ViewHandle,
    /// Bumped whenever a form is opened or closed
    form_generation: AtomicU64,
    issued_saves: AtomicU64,
    applied_save: Mutex<u64>,
}

impl SettingsSynchronizer {
    pub fn new(client: Arc<TelemetryClient>, view: ViewHandle) -> Self {
        Self {
            client,
            view,
            form_generation: AtomicU64::new(0),
            issued_saves: AtomicU64::new(0),
            applied_save: Mutex::new(0),
        }
    }

    /// Seed the threshold labels from the store without opening the form
    pub async fn refresh_labels(&self) -> crate::Result<()> {
        let settings = self.client.fetch_settings().await?;
        let mut view = self.view.write().await;
        view.thresholds.temperature = format_threshold(settings.temperature_threshold);
        view.thresholds.heart_rate = settings.heart_rate_threshold.to_string();
        view.thresholds.gforce = format_threshold(settings.gforce_threshold);
        Ok(())
    }

    /// Load the store's thresholds into the form and open it.
    ///
    /// On failure the form stays closed and a notice is shown instead.
    pub async fn open(&self) -> crate::Result<()> {
        match self.client.fetch_settings().await {
            Ok(settings) => {
                let mut view = self.view.write().await;
                self.form_generation.fetch_add(1, Ordering::SeqCst);
                view.settings.form = Some(populate(&settings));
                view.settings.notice = None;
                tracing::debug!("Settings form opened with {:?}", settings);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Error loading settings: {}", e);
                self.view.write().await.settings.notice = Some(LOAD_FAILED_NOTICE.to_string());
                Err(e)
            }
        }
    }

    /// Replace the text of one field. Ignored while the form is closed.
    pub async fn edit(&self, field: ThresholdField, text: &str) {
        let mut view = self.view.write().await;
        let Some(form) = view.settings.form.as_mut() else {
            tracing::debug!("Ignoring edit of {:?}: settings form is closed", field);
            return;
        };
        let target = match field {
            ThresholdField::Temperature => &mut form.temperature,
            ThresholdField::HeartRate => &mut form.heart_rate,
            ThresholdField::Gforce => &mut form.gforce,
        };
        *target = text.to_string();
    }

    /// Discard any edits and close the form. The store is not contacted.
    pub async fn close(&self, reason: CloseReason) {
        let mut view = self.view.write().await;
        if view.settings.form.take().is_some() {
            self.form_generation.fetch_add(1, Ordering::SeqCst);
            tracing::debug!("Settings form closed ({:?})", reason);
        }
    }

    /// Coerce the form fields and submit them to the store
    pub async fn save(&self) -> SaveOutcome {
        let (submission, generation) = {
            let view = self.view.read().await;
            match view.settings.form.as_ref() {
                Some(form) => (
                    ThresholdSubmission {
                        temperature_threshold: coerce_float(&form.temperature),
                        heart_rate_threshold: coerce_integer(&form.heart_rate),
                        gforce_threshold: coerce_float(&form.gforce),
                    },
                    self.form_generation.load(Ordering::SeqCst),
                ),
                None => return SaveOutcome::NotOpen,
            }
        };
        let seq = self.issued_saves.fetch_add(1, Ordering::SeqCst) + 1;

        match self.client.save_settings(&submission).await {
            Ok(()) => {
                let mut applied = self.applied_save.lock().await;
                if seq <= *applied {
                    tracing::debug!(
                        "Discarding save #{}: save #{} already applied",
                        seq,
                        *applied
                    );
                    return SaveOutcome::Superseded;
                }
                *applied = seq;

                let mut view = self.view.write().await;
                if let Some(value) = submission.temperature_threshold {
                    view.thresholds.temperature = format_threshold(value);
                }
                if let Some(value) = submission.heart_rate_threshold {
                    view.thresholds.heart_rate = value.to_string();
                }
                if let Some(value) = submission.gforce_threshold {
                    view.thresholds.gforce = format_threshold(value);
                }
                if self.form_generation.load(Ordering::SeqCst) == generation {
                    view.settings.form = None;
                    self.form_generation.fetch_add(1, Ordering::SeqCst);
                }
                tracing::info!("Settings saved (save #{}): {:?}", seq, submission);
                SaveOutcome::Saved(submission)
            }
            Err(DashboardError::Rejected(message)) => {
                tracing::warn!("Settings rejected by store: {}", message);
                self.show_form_error(seq, generation, &message).await;
                SaveOutcome::Rejected(message)
            }
            Err(e) => {
                tracing::warn!("Error saving settings: {}", e);
                self.show_form_error(seq, generation, SAVE_RETRY_PROMPT).await;
                SaveOutcome::Failed
            }
        }
    }

    async fn show_form_error(&self, seq: u64, generation: u64, message: &str) {
        let mut view = self.view.write().await;
        // Only the newest save may annotate the form it was submitted from
        if seq != self.issued_saves.load(Ordering::SeqCst)
            || generation != self.form_generation.load(Ordering::SeqCst)
        {
            tracing::debug!("Dropping error from save #{}: {}", seq, message);
            return;
        }
        if let Some(form) = view.settings.form.as_mut() {
            form.error = Some(message.to_string());
        }
    }
}

fn populate(settings: &ThresholdSettings) -> SettingsForm {
    SettingsForm {
        temperature: format_threshold(settings.temperature_threshold),
        heart_rate: settings.heart_rate_threshold.to_string(),
        gforce: format_threshold(settings.gforce_threshold),
        error: None,
    }
}

/// Whole values keep one decimal (`39.0`); others print as-is (`2.75`)
pub fn format_threshold(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Lenient float coercion, reading the longest numeric prefix after leading
/// whitespace: `"39.5 C"` is `39.5`, `"warm"` is `None`.
pub fn coerce_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();

    let mut end = sign_len(bytes);
    let int_digits = digit_run(&bytes[end..]);
    end += int_digits;
    if bytes.get(end) == Some(&b'.') {
        let frac_digits = digit_run(&bytes[end + 1..]);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if end == 0 || !bytes[..end].iter().any(u8::is_ascii_digit) {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp_sign = sign_len(&bytes[end + 1..]);
        let exp_digits = digit_run(&bytes[end + 1 + exp_sign..]);
        if exp_digits > 0 {
            end += 1 + exp_sign + exp_digits;
        }
    }

    text[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Lenient integer coercion over the leading sign and digits only:
/// `"130 bpm"` is `130`, `"130.9"` is `130` and `"1e3"` is `1`. A `0x`
/// prefix reads hexadecimal digits.
pub fn coerce_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let sign = sign_len(text.as_bytes());
    let negative = text.starts_with('-');
    let rest = &text[sign..];

    let magnitude = match rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        Some(hex) => {
            let digits = hex.bytes().take_while(|b| b.is_ascii_hexdigit()).count();
            if digits == 0 {
                return None;
            }
            i64::from_str_radix(&hex[..digits], 16).ok()?
        }
        None => {
            let digits = digit_run(rest.as_bytes());
            if digits == 0 {
                return None;
            }
            rest[..digits].parse::<i64>().ok()?
        }
    };

    Some(if negative { -magnitude } else { magnitude })
}

fn sign_len(bytes: &[u8]) -> usize {
    usize::from(matches!(bytes.first(), Some(b'+' | b'-')))
}

fn digit_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

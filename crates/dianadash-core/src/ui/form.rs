use std::collections::BTreeMap;
use std::future::Future;

use tracing::error;

use super::{AlertKind, SubmitButton};
use crate::page::Page;

/// Generic message shown when a submit handler fails
pub const SUBMIT_ERROR_MESSAGE: &str = "Error al procesar la solicitud";

/// Named field values captured at submit time
pub type FormData = BTreeMap<String, String>;

/// A form with exactly one submit button.
#[derive(Debug, Clone)]
pub struct Form {
    pub fields: FormData,
    pub submit: SubmitButton,
}

impl Form {
    pub fn new(submit_label: impl Into<String>) -> Self {
        Self {
            fields: FormData::new(),
            submit: SubmitButton::new(submit_label),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Run `on_submit` with the submit button in its loading state.
///
/// A failing handler is logged and reported with a generic error banner. The
/// button is restored whatever the outcome. Returns whether the handler
/// succeeded.
pub async fn handle_form_submit<F, Fut>(form: &mut Form, page: &mut Page, on_submit: F) -> bool
where
    F: FnOnce(FormData) -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    form.submit.remember_label();
    form.submit.set_loading(true);

    let result = on_submit(form.fields.clone()).await;

    let ok = match result {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, "Form submission error");
            page.show_alert(SUBMIT_ERROR_MESSAGE, AlertKind::Error);
            false
        }
    };

    form.submit.set_loading(false);
    ok
}

use super::html::escape;

/// Markup shown inside a button while its action is running
pub const SPINNER_HTML: &str = r#"<div class="loading"></div>"#;

#[derive(Debug, Clone, PartialEq, Eq)]
enum ButtonContent {
    Text(String),
    Spinner,
}

/// A form's submit button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitButton {
    content: ButtonContent,
    disabled: bool,
    /// Mirrors the `data-original-text` attribute
    original_text: Option<String>,
}

impl SubmitButton {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            content: ButtonContent::Text(label.into()),
            disabled: false,
            original_text: None,
        }
    }

    pub fn text_content(&self) -> &str {
        match &self.content {
            ButtonContent::Text(text) => text,
            ButtonContent::Spinner => "",
        }
    }

    pub fn inner_html(&self) -> String {
        match &self.content {
            ButtonContent::Text(text) => escape(text),
            ButtonContent::Spinner => SPINNER_HTML.to_string(),
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_loading(&self) -> bool {
        self.content == ButtonContent::Spinner
    }

    /// Remember the current label so `set_loading(false)` can restore it
    pub fn remember_label(&mut self) {
        self.original_text = Some(self.text_content().to_string());
    }

    /// Swap in the spinner and disable, or restore the label and enable.
    ///
    /// Restoring without a remembered label keeps the current text, which is
    /// empty while the spinner is showing.
    pub fn set_loading(&mut self, loading: bool) {
        if loading {
            self.disabled = true;
            self.content = ButtonContent::Spinner;
        } else {
            self.disabled = false;
            let label = self
                .original_text
                .clone()
                .unwrap_or_else(|| self.text_content().to_string());
            self.content = ButtonContent::Text(label);
        }
    }
}

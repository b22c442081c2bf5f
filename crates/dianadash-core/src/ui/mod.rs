//! Presentation helpers for dashboard pages.
//!
//! None of these share state with the session or request code:
//! - `format`: `es-ES` number, date and date-time formatting
//! - `alert`: transient banners that expire after five seconds
//! - `button` / `form`: submit button loading state and the submit wrapper
//! - `table`: generic table rendering from JSON rows

pub mod alert;
pub mod button;
pub mod form;
pub mod format;
pub mod html;
pub mod table;

pub use alert::{Alert, AlertContainer, AlertKind, ALERT_LIFETIME};
pub use button::SubmitButton;
pub use form::{handle_form_submit, Form, FormData};
pub use format::{format_date, format_date_time, format_number};
pub use table::{render_table, Column};

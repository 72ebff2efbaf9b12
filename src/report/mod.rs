//! Schedule rendering: HTML fragments and terminal tables.

pub mod format;
pub mod html;
pub mod money;

pub use format::{format_request_summary, format_schedule};
pub use html::{CALCULATING, render_html, render_html_error, render_html_loading};
pub use money::{format_brl, format_date};

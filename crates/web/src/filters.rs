//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Formats a decimal price in Brazilian real notation.
///
/// Usage in templates: `{{ item.price|brl }}` renders `R$ 22,50`.
#[askama::filter_fn]
pub fn brl(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_brl(&value.to_string()))
}

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Renders a WhatsApp chat link from a raw phone number.
///
/// Usage in templates: `{{ settings.whatsapp|whatsapp_link }}`
#[askama::filter_fn]
pub fn whatsapp_link(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(wa_me_url(&value.to_string()))
}

fn format_brl(text: &str) -> String {
    let (int, frac) = text.split_once('.').unwrap_or((text, "00"));
    let mut frac = frac.to_owned();
    frac.truncate(2);
    while frac.len() < 2 {
        frac.push('0');
    }
    format!("R$ {int},{frac}")
}

fn wa_me_url(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    format!("https://wa.me/{digits}")
}

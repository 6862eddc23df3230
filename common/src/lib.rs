use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationErrors;

/// `HH:MM` or `HH:MM:SS` on a 24-hour clock.
pub static TIME_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9](:[0-5][0-9])?$").expect("valid time regex")
});

/// Joins the messages of every field error into a single `; `-separated string.
///
/// Fields without a custom message contribute `"<field> is invalid"` so the caller
/// always gets something to show.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(m) => m.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
        password: String,
        #[validate(range(min = 1, max = 7))]
        weekday: i32,
    }

    #[test]
    fn time_format_accepts_short_and_long_forms() {
        assert!(TIME_FORMAT.is_match("09:00"));
        assert!(TIME_FORMAT.is_match("23:59:59"));
        assert!(!TIME_FORMAT.is_match("24:00"));
        assert!(!TIME_FORMAT.is_match("9:00"));
        assert!(!TIME_FORMAT.is_match("09:60"));
    }

    #[test]
    fn formats_custom_and_default_messages() {
        let probe = Probe {
            password: "abc".into(),
            weekday: 9,
        };
        let errors = probe.validate().unwrap_err();
        let msg = format_validation_errors(&errors);
        assert_eq!(msg, "Password must be at least 6 characters; weekday is invalid");
    }
}

use std::collections::HashMap;

/// Look up a bundled template body by identifier
pub fn body(template: &str) -> Option<&'static str> {
    match template {
        "booking-confirmation" => Some(include_str!("../templates/booking-confirmation.html")),
        "booking-cancellation" => Some(include_str!("../templates/booking-cancellation.html")),
        _ => None,
    }
}

/// Literal `{{key}}` substitution; this is the whole templating engine.
/// Placeholders without a matching variable are left in place.
pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
    let mut content = template.to_string();
    for (key, value) in vars {
        content = content.replace(&format!("{{{{{}}}}}", key), value);
    }
    content
}

use std::borrow::Cow;

use url::form_urlencoded;

/// Gateway wire names for option keys written in snake_case.
const WIRE_NAMES: &[(&str, &str)] = &[
    ("notify_url", "notifyURL"),
    ("client_correlator", "clientCorrelator"),
    ("callback_data", "callbackData"),
    ("destination_address", "destinationAddress"),
    ("sender_address", "senderAddress"),
    ("sender_name", "senderName"),
    ("request_id", "requestId"),
    ("message_id", "messageId"),
];

/// Translate a snake_case option key into the gateway's camel-case wire name.
///
/// Keys found in the mapping table use its spelling (`notify_url` becomes `notifyURL`);
/// anything else is camel-cased generically, and keys without `_` pass through unchanged.
pub fn wire_name(key: &str) -> Cow<'_, str> {
    if let Some((_, wire)) = WIRE_NAMES.iter().find(|(snake, _)| *snake == key) {
        return Cow::Borrowed(wire);
    }
    if !key.contains('_') {
        return Cow::Borrowed(key);
    }

    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for ch in key.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

/// Encode pairs as `application/x-www-form-urlencoded`, keeping their order.
pub fn encode_form(params: &[(String, String)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Percent-encode one URL path segment (`tel:+1415` becomes `tel%3A%2B1415`).
pub fn encode_segment(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        // byte_serialize writes spaces as `+`, which is literal inside a path.
        .replace('+', "%20")
}

/// Append snake_case options under their wire names.
pub fn push_options<'a>(
    params: &mut Vec<(String, String)>,
    options: impl IntoIterator<Item = (&'a str, Option<&'a str>)>,
) {
    for (key, value) in options {
        if let Some(value) = value {
            params.push((wire_name(key).into_owned(), value.to_owned()));
        }
    }
}

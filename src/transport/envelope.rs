use serde_json::Value;

/// JSON body of a gateway response, or `None` when the body is blank or not JSON.
pub fn decode_data(body: &[u8]) -> Option<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    serde_json::from_slice(body).ok()
}

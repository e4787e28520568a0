use serde::de::DeserializeOwned;
use serde_json::Value;

/// Raw outcome of one HTTP exchange with the gateway.
///
/// `status` is `None` when the request never produced an HTTP response (connection refused,
/// TLS failure, ...); `error` then describes the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResult {
    pub status: Option<u16>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub error: Option<String>,
}

impl HttpResult {
    /// Value of the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Envelope returned by every gateway call: the JSON-parsed body next to the raw transport
/// result.
///
/// Non-2xx statuses and transport failures are reported here too; inspect
/// [`Response::status`] to tell them apart.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    data: Option<Value>,
    transport: HttpResult,
}

impl Response {
    pub(crate) fn new(data: Option<Value>, transport: HttpResult) -> Self {
        Self { data, transport }
    }

    /// Parsed JSON body, or `None` when the body was empty or not JSON.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Raw transport result.
    pub fn transport(&self) -> &HttpResult {
        &self.transport
    }

    /// HTTP status code, if a response was received.
    pub fn status(&self) -> Option<u16> {
        self.transport.status
    }

    /// `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        matches!(self.transport.status, Some(200..=299))
    }

    /// `resourceReference.resourceURL` of a create/send response.
    pub fn resource_url(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .get("resourceReference")?
            .get("resourceURL")?
            .as_str()
    }

    /// Last path segment of [`Response::resource_url`]: the request or subscription id.
    pub fn resource_id(&self) -> Option<&str> {
        self.resource_url()?
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
    }

    /// Deserialize `data` into a caller-defined type. A missing body decodes from JSON `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(self.data.as_ref().unwrap_or(&Value::Null))
    }

    pub fn into_parts(self) -> (Option<Value>, HttpResult) {
        (self.data, self.transport)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    fn ok_result() -> HttpResult {
        HttpResult {
            status: Some(200),
            headers: vec![("Content-Type".to_owned(), "application/json".to_owned())],
            body: Vec::new(),
            error: None,
        }
    }

    #[test]
    fn resource_id_is_last_url_segment() {
        let data = json!({
            "resourceReference": {
                "resourceURL": "https://api.smsified.com/v1/smsmessaging/outbound/tel%3A%2B13035551212/requests/795bd02c8e343b2dfd673b67dd0ee55a"
            }
        });
        let response = Response::new(Some(data), ok_result());
        assert!(response.is_success());
        assert_eq!(
            response.resource_id(),
            Some("795bd02c8e343b2dfd673b67dd0ee55a")
        );
    }

    #[test]
    fn missing_data_yields_no_resource() {
        let response = Response::new(None, ok_result());
        assert_eq!(response.resource_url(), None);
        assert_eq!(response.resource_id(), None);
    }

    #[test]
    fn transport_failure_is_not_success() {
        let response = Response::new(
            None,
            HttpResult {
                status: None,
                headers: Vec::new(),
                body: Vec::new(),
                error: Some("connection refused".to_owned()),
            },
        );
        assert!(!response.is_success());
        assert_eq!(response.status(), None);
    }

    #[test]
    fn header_lookup_ignores_case() {
        assert_eq!(ok_result().header("content-type"), Some("application/json"));
    }

    #[test]
    fn json_decodes_into_typed_value() {
        #[derive(Debug, Deserialize)]
        struct SubscriptionList {
            #[serde(rename = "numberOfSubscriptions")]
            number_of_subscriptions: String,
        }

        let data = json!({ "numberOfSubscriptions": "0" });
        let response = Response::new(Some(data), ok_result());
        let list: SubscriptionList = response.json().unwrap();
        assert_eq!(list.number_of_subscriptions, "0");

        let empty = Response::new(None, ok_result());
        assert!(empty.json::<SubscriptionList>().is_err());
        assert!(empty.json::<Option<SubscriptionList>>().unwrap().is_none());
    }
}

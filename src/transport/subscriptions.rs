use url::form_urlencoded;

use crate::domain::{Address, SubscriptionId, SubscriptionOptions};

use super::form::{encode_form, encode_segment, push_options, wire_name};

const INBOUND_SUBSCRIPTIONS: &str = "/smsmessaging/inbound/subscriptions";
const OUTBOUND_SUBSCRIPTIONS: &str = "/smsmessaging/outbound/subscriptions";

pub fn create_inbound_subscription_path() -> &'static str {
    INBOUND_SUBSCRIPTIONS
}

/// `destinationAddress` first, then the options.
pub fn encode_create_inbound_subscription_form(
    destination_address: &Address,
    options: &SubscriptionOptions,
) -> String {
    let mut params = vec![(
        wire_name("destination_address").into_owned(),
        destination_address.as_str().to_owned(),
    )];
    push_subscription_options(&mut params, options);
    encode_form(&params)
}

pub fn create_outbound_subscription_path(sender_address: &Address) -> String {
    format!(
        "/smsmessaging/outbound/{}/subscriptions",
        encode_segment(sender_address.as_str())
    )
}

pub fn encode_subscription_form(options: &SubscriptionOptions) -> String {
    let mut params = Vec::new();
    push_subscription_options(&mut params, options);
    encode_form(&params)
}

fn push_subscription_options(params: &mut Vec<(String, String)>, options: &SubscriptionOptions) {
    push_options(
        params,
        [
            ("notify_url", options.notify_url.as_deref()),
            ("client_correlator", options.client_correlator.as_deref()),
            ("callback_data", options.callback_data.as_deref()),
        ],
    );
    for (key, value) in &options.extra {
        params.push((wire_name(key).into_owned(), value.clone()));
    }
}

pub fn list_inbound_subscriptions_path(destination_address: &Address) -> String {
    with_query(
        INBOUND_SUBSCRIPTIONS,
        "destination_address",
        destination_address,
    )
}

pub fn list_outbound_subscriptions_path(sender_address: &Address) -> String {
    with_query(OUTBOUND_SUBSCRIPTIONS, "sender_address", sender_address)
}

fn with_query(path: &str, key: &str, address: &Address) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(&wire_name(key), address.as_str())
        .finish();
    format!("{path}?{query}")
}

pub fn inbound_subscription_path(subscription_id: &SubscriptionId) -> String {
    format!(
        "{INBOUND_SUBSCRIPTIONS}/{}",
        encode_segment(subscription_id.as_str())
    )
}

pub fn outbound_subscription_path(subscription_id: &SubscriptionId) -> String {
    format!(
        "{OUTBOUND_SUBSCRIPTIONS}/{}",
        encode_segment(subscription_id.as_str())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(value: &str) -> Address {
        Address::new(value).unwrap()
    }

    #[test]
    fn create_inbound_puts_destination_first() {
        let body = encode_create_inbound_subscription_form(
            &address("17177455076"),
            &SubscriptionOptions::notify_url("http://foobar.com"),
        );
        assert_eq!(
            body,
            "destinationAddress=17177455076&notifyURL=http%3A%2F%2Ffoobar.com"
        );
    }

    #[test]
    fn subscription_form_encodes_all_options() {
        let options = SubscriptionOptions {
            notify_url: Some("bar".to_owned()),
            client_correlator: Some("baz".to_owned()),
            callback_data: Some("donkey".to_owned()),
            extra: Vec::new(),
        };
        assert_eq!(
            encode_subscription_form(&options),
            "notifyURL=bar&clientCorrelator=baz&callbackData=donkey"
        );
        assert_eq!(encode_subscription_form(&SubscriptionOptions::default()), "");
    }

    #[test]
    fn list_paths_carry_address_query() {
        assert_eq!(
            list_inbound_subscriptions_path(&address("14155551212")),
            "/smsmessaging/inbound/subscriptions?destinationAddress=14155551212"
        );
        assert_eq!(
            list_outbound_subscriptions_path(&address("tel:+13035551212")),
            "/smsmessaging/outbound/subscriptions?senderAddress=tel%3A%2B13035551212"
        );
    }

    #[test]
    fn resource_paths() {
        let id = SubscriptionId::new("3cf88f9cfd0dae96cbfdf16f18c07411").unwrap();
        assert_eq!(
            inbound_subscription_path(&id),
            "/smsmessaging/inbound/subscriptions/3cf88f9cfd0dae96cbfdf16f18c07411"
        );
        assert_eq!(
            outbound_subscription_path(&id),
            "/smsmessaging/outbound/subscriptions/3cf88f9cfd0dae96cbfdf16f18c07411"
        );
        assert_eq!(
            create_outbound_subscription_path(&address("17177455076")),
            "/smsmessaging/outbound/17177455076/subscriptions"
        );
    }
}

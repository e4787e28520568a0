use crate::domain::{Address, MessageId, MessageText, RequestId, SendOptions, SendSms};

use super::form::{encode_form, encode_segment, push_options, wire_name};

pub fn send_sms_path(sender_address: &Address) -> String {
    format!(
        "/smsmessaging/outbound/{}/requests",
        encode_segment(sender_address.as_str())
    )
}

/// Form body for `send_sms`: one `address` per recipient in input order, then `message`,
/// then the options under their wire names.
pub fn encode_send_sms_form(request: &SendSms) -> String {
    let mut params = request
        .addresses()
        .iter()
        .map(|address| (Address::FIELD.to_owned(), address.as_str().to_owned()))
        .collect::<Vec<_>>();
    params.push((
        MessageText::FIELD.to_owned(),
        request.message().as_str().to_owned(),
    ));
    push_send_options(&mut params, request.options());
    encode_form(&params)
}

fn push_send_options(params: &mut Vec<(String, String)>, options: &SendOptions) {
    push_options(
        params,
        [
            ("notify_url", options.notify_url.as_deref()),
            ("client_correlator", options.client_correlator.as_deref()),
            ("callback_data", options.callback_data.as_deref()),
            ("sender_name", options.sender_name.as_deref()),
        ],
    );
    for (key, value) in &options.extra {
        params.push((wire_name(key).into_owned(), value.clone()));
    }
}

pub fn delivery_infos_path(sender_address: &Address, request_id: &RequestId) -> String {
    format!(
        "/smsmessaging/outbound/{}/requests/{}/deliveryInfos",
        encode_segment(sender_address.as_str()),
        encode_segment(request_id.as_str())
    )
}

pub fn message_path(message_id: &MessageId) -> String {
    format!("/messages/{}", encode_segment(message_id.as_str()))
}

/// `query` is passed through as-is (e.g. `start=2011-02-14&end=2011-02-15`).
pub fn search_messages_path(query: &str) -> String {
    let query = query.trim_start_matches('?');
    if query.is_empty() {
        "/messages".to_owned()
    } else {
        format!("/messages?{query}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(value: &str) -> Address {
        Address::new(value).unwrap()
    }

    #[test]
    fn encode_single_recipient() {
        let request = SendSms::to(
            address("14155551212"),
            MessageText::new("Hola from RSpec!").unwrap(),
        );
        assert_eq!(
            encode_send_sms_form(&request),
            "address=14155551212&message=Hola+from+RSpec%21"
        );
    }

    #[test]
    fn encode_repeats_address_in_input_order() {
        let request = SendSms::new(
            vec![address("14155551212"), address("13035551212")],
            MessageText::new("Hola from RSpec!").unwrap(),
        )
        .unwrap();
        assert_eq!(
            encode_send_sms_form(&request),
            "address=14155551212&address=13035551212&message=Hola+from+RSpec%21"
        );

        let request =
            SendSms::new(vec![address("A"), address("B")], MessageText::new("x").unwrap())
                .unwrap();
        assert!(encode_send_sms_form(&request).starts_with("address=A&address=B&"));
    }

    #[test]
    fn encode_options_use_wire_names() {
        let request = SendSms::to(address("14155551212"), MessageText::new("hi").unwrap())
            .with_options(SendOptions {
                notify_url: Some("http://foobar.com".to_owned()),
                client_correlator: Some("abc".to_owned()),
                extra: vec![("max_retries".to_owned(), "2".to_owned())],
                ..Default::default()
            });
        assert_eq!(
            encode_send_sms_form(&request),
            "address=14155551212&message=hi&notifyURL=http%3A%2F%2Ffoobar.com&clientCorrelator=abc&maxRetries=2"
        );
    }

    #[test]
    fn paths_encode_segments() {
        assert_eq!(
            send_sms_path(&address("13035551212")),
            "/smsmessaging/outbound/13035551212/requests"
        );
        assert_eq!(
            send_sms_path(&address("tel:+13035551212")),
            "/smsmessaging/outbound/tel%3A%2B13035551212/requests"
        );
        assert_eq!(
            delivery_infos_path(
                &address("13035551212"),
                &RequestId::new("f359193765f6a3149ca76a4508e21234").unwrap()
            ),
            "/smsmessaging/outbound/13035551212/requests/f359193765f6a3149ca76a4508e21234/deliveryInfos"
        );
        assert_eq!(
            message_path(&MessageId::new("74ae6147f915eabf87b35b9ea30c5916").unwrap()),
            "/messages/74ae6147f915eabf87b35b9ea30c5916"
        );
    }

    #[test]
    fn search_path_passes_query_through() {
        assert_eq!(
            search_messages_path("start=2011-02-14&end=2011-02-15"),
            "/messages?start=2011-02-14&end=2011-02-15"
        );
        assert_eq!(search_messages_path("?start=x"), "/messages?start=x");
        assert_eq!(search_messages_path(""), "/messages");
    }
}

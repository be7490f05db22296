use opentelemetry::{KeyValue, metrics::UpDownCounter};
use std::sync::LazyLock;

static STATDS: LazyLock<UpDownCounter<i64>> = LazyLock::new(|| {
    logfire::i64_up_down_counter("wa_relay_statds")
        .with_description("WhatsApp relay statistics")
        .with_unit("message")
        .build()
});

fn incr_statds(metric: String, value: String) {
    STATDS.add(1, &[KeyValue::new(metric, value)]);
}

/// Outcome of an outbound send: "sent", "rejected" or "failed"
pub fn incr_outbound_message_statds(outcome: &str) {
    incr_statds("outbound_message".to_string(), outcome.into())
}

pub fn incr_inbound_message_statds(msg_type: &str) {
    incr_statds("inbound_message".to_string(), msg_type.into())
}

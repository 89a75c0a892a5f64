use serde::Deserialize;

/// What to do when some requested product ids do not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedProductPolicy {
    /// Place the order with the products that were found.
    #[default]
    Drop,
    /// Fail the whole request with `NotFound("product")`.
    Reject,
}

/// Whether order placement waits for notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Notify before returning; the report comes back with the order.
    #[default]
    Inline,
    /// Notify on a spawned task; the order returns without a report.
    Background,
}

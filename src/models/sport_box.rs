//! Bookable box model.

use serde::{Deserialize, Serialize};

/// A bookable space as listed by the gateway. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportBox {
    /// Unique box name (also used as the booking key)
    pub name: String,
    /// Hourly price in rubles
    pub price_per_hour: f64,
    /// Whether the box is currently free
    #[serde(default)]
    pub available: bool,
}

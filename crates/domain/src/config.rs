// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Static business configuration.
//!
//! Price suggestions, stock suggestions, and the comuna price list are
//! read-only data loaded at startup and handed to the billing and
//! inventory surfaces. The defaults describe the Santiago shop.

use serde::{Deserialize, Serialize};

/// The shop's origin point for delivery planning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginPoint {
    /// Street address.
    pub address: String,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

/// Suggested delivery price for one comuna.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComunaPrice {
    /// Comuna name as displayed at intake.
    pub comuna: String,
    /// Suggested delivery price in Chilean pesos.
    pub delivery_price: i64,
}

/// Immutable configuration record loaded at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessConfig {
    /// IANA timezone name the back office operates in.
    pub timezone: String,
    /// The shop's origin point.
    pub origin: OriginPoint,
    /// Per-comuna delivery price suggestions.
    pub comuna_prices: Vec<ComunaPrice>,
    /// Arrangement price suggestions shown at intake, in Chilean pesos.
    pub price_suggestions: Vec<i64>,
    /// Restock quantity suggestions shown in catalog management.
    pub stock_suggestions: Vec<i64>,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            timezone: String::from("America/Santiago"),
            origin: OriginPoint {
                address: String::from("Gran Vía 8113, Vitacura, Santiago"),
                lat: -33.373_081_2,
                lon: -70.560_421,
            },
            comuna_prices: vec![
                ComunaPrice {
                    comuna: String::from("Vitacura"),
                    delivery_price: 5_000,
                },
                ComunaPrice {
                    comuna: String::from("Las Condes"),
                    delivery_price: 6_000,
                },
                ComunaPrice {
                    comuna: String::from("Lo Barnechea"),
                    delivery_price: 8_000,
                },
                ComunaPrice {
                    comuna: String::from("Providencia"),
                    delivery_price: 7_000,
                },
                ComunaPrice {
                    comuna: String::from("La Reina"),
                    delivery_price: 8_000,
                },
                ComunaPrice {
                    comuna: String::from("Ñuñoa"),
                    delivery_price: 9_000,
                },
                ComunaPrice {
                    comuna: String::from("Santiago Centro"),
                    delivery_price: 10_000,
                },
                ComunaPrice {
                    comuna: String::from("Huechuraba"),
                    delivery_price: 10_000,
                },
            ],
            price_suggestions: vec![20_000, 25_000, 30_000, 35_000, 40_000, 50_000, 60_000],
            stock_suggestions: vec![10, 25, 50, 100],
        }
    }
}

impl BusinessConfig {
    /// Looks up the suggested delivery price for a comuna.
    #[must_use]
    pub fn delivery_price_for(&self, comuna: &str) -> Option<i64> {
        self.comuna_prices
            .iter()
            .find(|entry| entry.comuna.eq_ignore_ascii_case(comuna))
            .map(|entry| entry.delivery_price)
    }
}

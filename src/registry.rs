//! Instrument registry: the canonical curated list of tradable NGX
//! symbols with display metadata.
//!
//! The registry owns instrument identity; every other component refers to
//! instruments by symbol. The list is refreshed only by curation and is
//! immutable during a trading session.

use crate::types::Instrument;
use std::collections::HashMap;
use std::sync::Arc;

/// Curated NGX instruments: (symbol, name, sector, market cap in billions
/// of Naira, reference price the cap was taken at).
const CURATED: &[(&str, &str, &str, f64, f64)] = &[
    ("MTNN", "MTN Nigeria Communications Plc", "Telecommunications", 5329.89, 264.20),
    ("DANGCEM", "Dangote Cement Plc", "Industrial Goods", 4618.95, 480.00),
    ("AIRTELAFRI", "Airtel Africa Plc", "Telecommunications", 4134.82, 2050.00),
    ("BUACEMENT", "BUA Cement Plc", "Industrial Goods", 2436.21, 93.00),
    ("NESTLE", "Nestle Nigeria Plc", "Consumer Goods", 1190.12, 950.00),
    ("ZENITHBANK", "Zenith Bank Plc", "Banking", 1099.82, 37.80),
    ("BUAFOODS", "BUA Foods Plc", "Consumer Goods", 1085.76, 418.00),
    ("GEREGU", "Geregu Power Plc", "Utilities", 1000.00, 650.00),
    ("GTCO", "Guaranty Trust Holding Company Plc", "Banking", 882.94, 43.50),
    ("FBNH", "FBN Holdings Plc", "Banking", 592.27, 24.80),
    ("UBA", "United Bank for Africa Plc", "Banking", 580.93, 26.50),
    ("ACCESSCORP", "Access Holdings Plc", "Banking", 576.11, 22.70),
    ("SEPLAT", "Seplat Energy Plc", "Oil & Gas", 520.47, 2800.00),
    ("OANDO", "Oando Plc", "Oil & Gas", 447.53, 12.75),
    ("STANBIC", "Stanbic IBTC Holdings Plc", "Banking", 390.25, 72.00),
    ("ETI", "Ecobank Transnational Incorporated", "Banking", 386.48, 21.15),
    ("NB", "Nigerian Breweries Plc", "Consumer Goods", 260.42, 32.90),
    ("FLOURMILL", "Flour Mills of Nigeria Plc", "Consumer Goods", 206.25, 37.50),
    ("TRANSCORP", "Transcorp Plc", "Conglomerates", 203.58, 12.40),
    ("WAPCO", "Lafarge Africa Plc", "Industrial Goods", 155.65, 45.80),
];

/// Canonical list of tradable symbols.
pub struct InstrumentRegistry {
    instruments: Vec<Instrument>,
    index: HashMap<String, usize>,
}

impl InstrumentRegistry {
    /// Build the curated registry.
    pub fn curated() -> Arc<Self> {
        let instruments: Vec<Instrument> = CURATED
            .iter()
            .map(|(symbol, name, sector, cap_billions, reference_price)| Instrument {
                symbol: symbol.to_string(),
                name: name.to_string(),
                sector: Some(sector.to_string()),
                market_cap: cap_billions * 1e9,
                shares_outstanding: None,
                reference_price: *reference_price,
            })
            .collect();

        Self::from_instruments(instruments)
    }

    /// Build a registry from an explicit instrument list. Used by tests.
    pub fn from_instruments(instruments: Vec<Instrument>) -> Arc<Self> {
        let index = instruments
            .iter()
            .enumerate()
            .map(|(i, inst)| (inst.symbol.clone(), i))
            .collect();

        Arc::new(Self { instruments, index })
    }

    /// All instruments, ordered by curated market cap descending.
    pub fn all(&self) -> &[Instrument] {
        &self.instruments
    }

    /// Look up an instrument by symbol, case-insensitively.
    pub fn get(&self, symbol: &str) -> Option<&Instrument> {
        self.index
            .get(&symbol.to_uppercase())
            .map(|&i| &self.instruments[i])
    }

    /// All tracked symbols.
    pub fn symbols(&self) -> Vec<String> {
        self.instruments.iter().map(|i| i.symbol.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

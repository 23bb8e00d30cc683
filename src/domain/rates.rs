//! Zone, VAT and warehouse tables.
//!
//! - Parsed from JSON (embedded default or an operator-supplied file).
//! - Validated once, then installed process-wide and never mutated.

use std::{
    collections::{BTreeMap, HashSet},
    fs, io,
    path::Path,
    sync::OnceLock,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::{ShippingZone, Warehouse};
use super::error::InvalidInput;
use super::vat::validate_vat_rate;
use crate::util::assets;

static ACTIVE_TABLE: OnceLock<RateTable> = OnceLock::new();

#[derive(Debug, Error)]
pub enum RateTableError {
    #[error("failed to read rate table {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("malformed rate table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("rate table has no shipping zones")]
    NoZones,
    #[error("duplicate zone id `{0}`")]
    DuplicateZone(String),
    #[error("zone `{zone}` has a negative or non-finite rate")]
    BadZoneRate { zone: String },
    #[error("country `{country}`: {source}")]
    BadVatRate {
        country: String,
        source: InvalidInput,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    zones: Vec<ShippingZone>,
    vat_rates: BTreeMap<String, f64>,
    #[serde(default)]
    warehouses: Vec<Warehouse>,
}

impl RateTable {
    pub fn new(
        zones: Vec<ShippingZone>,
        vat_rates: BTreeMap<String, f64>,
        warehouses: Vec<Warehouse>,
    ) -> Result<Self, RateTableError> {
        let table = Self {
            zones,
            vat_rates,
            warehouses,
        };
        table.validate()?;
        Ok(table)
    }

    pub fn from_json(raw: &str) -> Result<Self, RateTableError> {
        let table: RateTable = serde_json::from_str(raw)?;
        table.validate()?;
        Ok(table)
    }

    pub fn from_path(path: &Path) -> Result<Self, RateTableError> {
        let raw = fs::read_to_string(path).map_err(|source| RateTableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Table shipped inside the binary.
    pub fn embedded() -> Result<Self, RateTableError> {
        Self::from_json(assets::default_rates_json())
    }

    /// Installs the table for the rest of the process. The first call wins;
    /// later calls get the already-installed table back.
    pub fn install(self) -> &'static RateTable {
        let installed = ACTIVE_TABLE.get_or_init(|| self);
        tracing::debug!(
            zones = installed.zones.len(),
            countries = installed.vat_rates.len(),
            "rate table installed"
        );
        installed
    }

    /// Installed table, loading the embedded default on first use.
    pub fn active() -> Result<&'static RateTable, RateTableError> {
        if let Some(table) = ACTIVE_TABLE.get() {
            return Ok(table);
        }
        Ok(Self::embedded()?.install())
    }

    pub fn zones(&self) -> &[ShippingZone] {
        &self.zones
    }

    pub fn zone(&self, id: &str) -> Result<&ShippingZone, InvalidInput> {
        self.zones
            .iter()
            .find(|zone| zone.id == id)
            .ok_or_else(|| InvalidInput::UnknownZone(id.to_string()))
    }

    pub fn vat_rate(&self, country: &str) -> Result<f64, InvalidInput> {
        self.vat_rates
            .get(country)
            .copied()
            .ok_or_else(|| InvalidInput::UnknownCountry(country.to_string()))
    }

    pub fn vat_countries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.vat_rates
            .iter()
            .map(|(country, rate)| (country.as_str(), *rate))
    }

    pub fn warehouses(&self) -> &[Warehouse] {
        &self.warehouses
    }

    pub fn warehouse(&self, id: &str) -> Option<&Warehouse> {
        self.warehouses.iter().find(|wh| wh.id == id)
    }

    fn validate(&self) -> Result<(), RateTableError> {
        if self.zones.is_empty() {
            return Err(RateTableError::NoZones);
        }

        let mut seen = HashSet::new();
        for zone in &self.zones {
            if !seen.insert(zone.id.as_str()) {
                return Err(RateTableError::DuplicateZone(zone.id.clone()));
            }
            let rates_ok = [zone.base_rate, zone.per_kg_rate]
                .iter()
                .all(|rate| rate.is_finite() && *rate >= 0.0);
            if !rates_ok {
                return Err(RateTableError::BadZoneRate {
                    zone: zone.id.clone(),
                });
            }
        }

        for (country, rate) in &self.vat_rates {
            validate_vat_rate(*rate).map_err(|source| RateTableError::BadVatRate {
                country: country.clone(),
                source,
            })?;
        }

        Ok(())
    }
}

//! Localised labels.
//!
//! French is the source language: a message missing in the requested
//! language falls back to French, and a key missing everywhere renders as
//! its own name.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
    It,
    Es,
    Pt,
    De,
    Zh,
    Ar,
    Hi,
}

impl Language {
    pub const ALL: [Language; 9] = [
        Language::Fr,
        Language::En,
        Language::It,
        Language::Es,
        Language::Pt,
        Language::De,
        Language::Zh,
        Language::Ar,
        Language::Hi,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
            Language::It => "it",
            Language::Es => "es",
            Language::Pt => "pt",
            Language::De => "de",
            Language::Zh => "zh",
            Language::Ar => "ar",
            Language::Hi => "hi",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::Fr => "Français",
            Language::En => "English",
            Language::It => "Italiano",
            Language::Es => "Español",
            Language::Pt => "Português",
            Language::De => "Deutsch",
            Language::Zh => "中文",
            Language::Ar => "العربية",
            Language::Hi => "हिन्दी",
        }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Ar)
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or_else(|| format!("unsupported language `{s}`"))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

macro_rules! message_keys {
    ($($variant:ident => $key:literal),+ $(,)?) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum MessageKey {
            $($variant),+
        }

        impl MessageKey {
            pub const ALL: &'static [MessageKey] = &[$(MessageKey::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(MessageKey::$variant => $key),+
                }
            }
        }
    };
}

message_keys! {
    SimTitle => "sim_title",
    SimOrigin => "sim_origin",
    SimDest => "sim_dest",
    SimDim => "sim_dim",
    SimWeight => "sim_weight",
    SimVolumetric => "sim_volumetric",
    SimVolumetricDesc => "sim_volumetric_desc",
    SimEstimate => "sim_estimate",
    SimDisclaimer => "sim_disclaimer",
    SimAiAnalyzing => "sim_ai_analyzing",
    VatCalcTitle => "vat_calc_title",
    VatLabelAmount => "vat_label_amount",
    VatLabelCountry => "vat_label_country",
    VatResultGross => "vat_result_gross",
    VatResultFee => "vat_result_fee",
    VatResultNet => "vat_result_net",
    VatDisclaimer => "vat_disclaimer",
    DashTotalPackages => "dash_total_packages",
    DashInStockWeight => "dash_in_stock_weight",
    DashStatusPending => "dash_status_pending",
    DashStatusStock => "dash_status_stock",
    DashStatusConsolidated => "dash_status_consolidated",
    DashStatusShipped => "dash_status_shipped",
    DashStatusDelivered => "dash_status_delivered",
    ZoneEurope => "zone_europe",
    ZoneNorthAmerica => "zone_north_america",
    ZoneAsia => "zone_asia",
    ZoneWorld => "zone_world",
    WhFr => "wh_fr",
    WhUs => "wh_us",
    WhUk => "wh_uk",
    WhDe => "wh_de",
    WhIt => "wh_it",
    WhEs => "wh_es",
}

impl FromStr for MessageKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or(())
    }
}

/// Text for `key` in `lang`, with the French-then-key-name fallback.
pub fn translate(lang: Language, key: MessageKey) -> &'static str {
    lookup(lang, key)
        .or_else(|| french(key))
        .unwrap_or_else(|| key.as_str())
}

/// Same policy for keys assembled at run time, e.g. `zone_{id}`. Unknown
/// keys come back verbatim.
pub fn translate_dynamic<'a>(lang: Language, key: &'a str) -> &'a str {
    match key.parse::<MessageKey>() {
        Ok(known) => translate(lang, known),
        Err(()) => key,
    }
}

/// Whether `lang` carries its own text for `key`.
pub fn has_translation(lang: Language, key: MessageKey) -> bool {
    lookup(lang, key).is_some()
}

fn lookup(lang: Language, key: MessageKey) -> Option<&'static str> {
    match lang {
        Language::Fr => french(key),
        Language::En => english(key),
        Language::De => german(key),
        Language::Es => spanish(key),
        Language::It => italian(key),
        Language::Pt => portuguese(key),
        Language::Ar => arabic(key),
        Language::Zh | Language::Hi => None,
    }
}

fn french(key: MessageKey) -> Option<&'static str> {
    use MessageKey::*;
    Some(match key {
        SimTitle => "Simulateur d'expédition",
        SimOrigin => "Entrepôt d'origine",
        SimDest => "Destination",
        SimDim => "Dimensions (cm)",
        SimWeight => "Poids réel",
        SimVolumetric => "Poids volumétrique appliqué",
        SimVolumetricDesc => "Le transporteur facture le poids le plus élevé.",
        SimEstimate => "Estimation",
        SimDisclaimer => "Estimation indicative, hors assurance et droits de douane.",
        SimAiAnalyzing => "Analyse de l'objet en cours...",
        VatCalcTitle => "Calculateur Off-Tax",
        VatLabelAmount => "Montant TTC",
        VatLabelCountry => "Pays d'achat",
        VatResultGross => "TVA récupérable",
        VatResultFee => "Frais de traitement",
        VatResultNet => "Remboursement net",
        VatDisclaimer => "Réservé aux résidents hors UE.",
        DashTotalPackages => "Colis au total",
        DashInStockWeight => "Poids en entrepôt",
        DashStatusPending => "En attente",
        DashStatusStock => "En stock",
        DashStatusConsolidated => "Consolidé",
        DashStatusShipped => "Expédié",
        DashStatusDelivered => "Livré",
        ZoneEurope => "Europe",
        ZoneNorthAmerica => "Amérique du Nord",
        ZoneAsia => "Asie",
        ZoneWorld => "Reste du monde",
        WhFr => "France",
        WhUs => "États-Unis",
        WhUk => "Royaume-Uni",
        WhDe => "Allemagne",
        WhIt => "Italie",
        WhEs => "Espagne",
    })
}

fn english(key: MessageKey) -> Option<&'static str> {
    use MessageKey::*;
    Some(match key {
        SimTitle => "Shipping simulator",
        SimOrigin => "Origin warehouse",
        SimDest => "Destination",
        SimDim => "Dimensions (cm)",
        SimWeight => "Actual weight",
        SimVolumetric => "Volumetric weight applied",
        SimVolumetricDesc => "Carriers bill whichever weight is higher.",
        SimEstimate => "Estimate",
        SimDisclaimer => "Indicative estimate, excluding insurance and customs duties.",
        SimAiAnalyzing => "Analysing your item...",
        VatCalcTitle => "Off-Tax calculator",
        VatLabelAmount => "Amount incl. VAT",
        VatLabelCountry => "Purchase country",
        VatResultGross => "Reclaimable VAT",
        VatResultFee => "Handling fee",
        VatResultNet => "Net refund",
        VatDisclaimer => "Non-EU residents only.",
        DashTotalPackages => "Total packages",
        DashInStockWeight => "Weight in warehouse",
        DashStatusPending => "Pending",
        DashStatusStock => "In stock",
        DashStatusConsolidated => "Consolidated",
        DashStatusShipped => "Shipped",
        DashStatusDelivered => "Delivered",
        ZoneEurope => "Europe",
        ZoneNorthAmerica => "North America",
        ZoneAsia => "Asia",
        ZoneWorld => "Rest of the world",
        WhFr => "France",
        WhUs => "United States",
        WhUk => "United Kingdom",
        WhDe => "Germany",
        WhIt => "Italy",
        WhEs => "Spain",
    })
}

fn german(key: MessageKey) -> Option<&'static str> {
    use MessageKey::*;
    match key {
        SimTitle => Some("Versandrechner"),
        SimDest => Some("Ziel"),
        SimEstimate => Some("Schätzung"),
        VatCalcTitle => Some("Off-Tax-Rechner"),
        VatResultNet => Some("Nettoerstattung"),
        ZoneEurope => Some("Europa"),
        ZoneNorthAmerica => Some("Nordamerika"),
        ZoneAsia => Some("Asien"),
        ZoneWorld => Some("Restliche Welt"),
        WhFr => Some("Frankreich"),
        WhUs => Some("Vereinigte Staaten"),
        WhUk => Some("Vereinigtes Königreich"),
        WhDe => Some("Deutschland"),
        WhIt => Some("Italien"),
        WhEs => Some("Spanien"),
        _ => None,
    }
}

fn spanish(key: MessageKey) -> Option<&'static str> {
    use MessageKey::*;
    match key {
        SimTitle => Some("Simulador de envío"),
        SimDest => Some("Destino"),
        SimEstimate => Some("Estimación"),
        VatCalcTitle => Some("Calculadora Off-Tax"),
        VatResultNet => Some("Reembolso neto"),
        ZoneEurope => Some("Europa"),
        ZoneNorthAmerica => Some("América del Norte"),
        ZoneAsia => Some("Asia"),
        ZoneWorld => Some("Resto del mundo"),
        WhEs => Some("España"),
        _ => None,
    }
}

fn italian(key: MessageKey) -> Option<&'static str> {
    use MessageKey::*;
    match key {
        SimTitle => Some("Simulatore di spedizione"),
        SimDest => Some("Destinazione"),
        SimEstimate => Some("Stima"),
        VatResultNet => Some("Rimborso netto"),
        ZoneEurope => Some("Europa"),
        ZoneWorld => Some("Resto del mondo"),
        WhIt => Some("Italia"),
        _ => None,
    }
}

fn portuguese(key: MessageKey) -> Option<&'static str> {
    use MessageKey::*;
    match key {
        SimTitle => Some("Simulador de envio"),
        SimEstimate => Some("Estimativa"),
        ZoneWorld => Some("Resto do mundo"),
        _ => None,
    }
}

fn arabic(key: MessageKey) -> Option<&'static str> {
    use MessageKey::*;
    match key {
        SimTitle => Some("محاكي الشحن"),
        SimEstimate => Some("التقدير"),
        ZoneWorld => Some("بقية العالم"),
        _ => None,
    }
}

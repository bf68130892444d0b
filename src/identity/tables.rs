//! EURIDIS Constructor and Device Type Database
//!
//! Codes found in the first and third pairs of digits of a meter address.
//! Unassigned codes are absent from the tables: callers keep the code and
//! report no name.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Known meter constructors, keyed by their two digit code
pub static CONSTRUCTORS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();

    map.insert("01", "CROUZET / MONETEL");
    map.insert("02", "SAGEM / SAGEMCOM");
    map.insert("03", "SCHLUMBERGER / ACTARIS / ITRON");
    map.insert("04", "LANDIS ET GYR / SIEMENS METERING / LANDIS+GYR");
    map.insert("05", "SAUTER / STEPPER ENERGIE France / ZELLWEGER");
    map.insert("06", "ITRON");
    map.insert("07", "MAEC");
    map.insert("08", "MATRA-CHAUVIN ARNOUX / ENERDIS");
    map.insert("09", "FAURE-HERMAN");
    map.insert("10", "SEVME / SIS");
    map.insert("11", "MAGNOL / ELSTER / HONEYWELL");
    map.insert("12", "GAZ THERMIQUE");
    // 13 unassigned
    map.insert("14", "GHIELMETTI / DIALOG E.S. / MICRONIQUE");
    map.insert("15", "MECELEC");
    map.insert("16", "LEGRAND / BACO");
    map.insert("17", "SERD-SCHLUMBERGER");
    map.insert("18", "SCHNEIDER / MERLIN GERIN / GARDY");
    map.insert("19", "GENERAL ELECTRIC / POWER CONTROL");
    map.insert("20", "NUOVO PIGNONE / DRESSER");
    map.insert("21", "SCLE");
    map.insert("22", "EDF");
    map.insert("23", "GDF / GDF-SUEZ");
    map.insert("24", "HAGER – GENERAL ELECTRIC");
    map.insert("25", "DELTA-DORE");
    map.insert("26", "RIZ");
    map.insert("27", "ISKRAEMECO");
    map.insert("28", "GMT");
    map.insert("29", "ANALOG DEVICE");
    map.insert("30", "MICHAUD");
    map.insert("31", "HEXING ELECTRICAL CO. Ltd");
    map.insert("32", "SIAME");
    map.insert("33", "LARSEN & TOUBRO Limited");
    map.insert("34", "ELSTER / HONEYWELL");
    map.insert("35", "ELECTRONIC AFZAR AZMA");
    map.insert("36", "ADVANCED ELECTRONIC COMPANY Ldt");
    map.insert("37", "AEM");
    map.insert("38", "ZHEJIANG CHINT INSTRUMENT & METER CO. Ldt");
    map.insert("39", "ZIV");

    // ===== EXPORT =====

    map.insert("70", "LANDIS et GYR (export ou régie)");
    map.insert("71", "STEPPER ENERGIE France (export ou régie)");

    // ===== OVERSEAS TERRITORIES =====

    map.insert("81", "SAGEM / SAGEMCOM");
    map.insert("82", "LANDIS ET GYR / SIEMENS METERING / LANDIS+GYR");
    map.insert("83", "ELSTER / HONEYWELL");
    map.insert("84", "SAGEM / SAGEMCOM");
    map.insert("85", "ITRON");

    map
});

/// Known device types, keyed by their two digit code
pub static DEVICE_TYPES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();

    // ===== PRE-LINKY ELECTRONIC METERS =====

    map.insert("22", "Compteur monophasé 90 A ZCD126 - 175 Hz taux normal");
    map.insert("23", "Compteur monophasé 90 A ZCD126 - 175 Hz demi taux");
    map.insert("25", "Compteur monophasé 90 A L16C6 - Simple tarif");
    map.insert("26", "Compteur SAGEM C2000-4 – CE24MM10");
    map.insert("27", "Compteur SAGEM C2000-4 – CE24MM12");
    map.insert("28", "Compteur monophasé 90 A L16C6 - 175 Hz taux normal");
    map.insert("29", "Compteur monophasé 90 A L16C6 - 175 Hz demi-taux");
    map.insert("30", "Compteur Triphasé 60 A ZMD126 (L18C5) - 175 Hz taux normal");
    map.insert("31", "Compteur Triphasé 60 A ZMD126 (L18C5) - 175 Hz demi taux");

    // ===== LINKY =====

    map.insert("61", "Compteur monophasé 60 A généralisation Linky G3 - arrivée puissance haute");
    map.insert("62", "Compteur monophasé 90 A généralisation Linky G1 - arrivée puissance basse");
    map.insert("63", "Compteur triphasé 60 A généralisation Linky G1 - arrivée puissance basse");
    map.insert("64", "Compteur monophasé 60 A généralisation Linky G3 - arrivée puissance basse");
    map.insert("65", "Compteur monophasé 90A LINKY expérimentation CPL G3");
    map.insert("66", "Module du compteur modulaire généralisation");
    map.insert("67", "Compteur monophasé 90A LINKY - pilote G1 - arrivée basse");
    map.insert("68", "Compteur triphasé 60A LINKY - pilote G1 - arrivée basse");
    map.insert("70", "Compteur monophasé Linky 60 A mise au point G3");
    map.insert("71", "Compteur triphasé Linky 60 A mise au point G3");
    map.insert("75", "Compteur monophasé 90 A généralisation Linky G3 - arrivée puissance basse");
    map.insert("76", "Compteur triphasé 60 A généralisation Linky G3 - arrivée puissance basse");

    map
});

/// Looks up a constructor name by code
pub fn constructor_name(code: &str) -> Option<&'static str> {
    CONSTRUCTORS.get(code).copied()
}

/// Looks up a device type name by code
pub fn device_type_name(code: &str) -> Option<&'static str> {
    DEVICE_TYPES.get(code).copied()
}

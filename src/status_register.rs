//! # Status Register Decoding
//!
//! The standard mode `STGE` group carries a 32-bit status register written as
//! eight hexadecimal digits. Each [`StatusRegisterField`] addresses a bit range
//! of that register; single bit fields decode to a boolean, wider fields map
//! their value through a label table.
//!
//! ## Usage
//!
//! ```rust
//! use linky_tic::status_register::{get_status, StatusRegisterField, StatusValue};
//!
//! let contact = get_status("013AC501", StatusRegisterField::ContactSec).unwrap();
//! assert_eq!(contact, StatusValue::Flag(true));
//!
//! let tarif = get_status("013AC501", StatusRegisterField::TarifContratFourniture).unwrap();
//! assert_eq!(tarif, StatusValue::Label("Index 2"));
//! ```

use crate::error::TicError;
use serde::Serialize;
use std::fmt;

pub const ORGANE_COUPURE: &[&str] = &[
    "Fermé",
    "Ouvert sur surpuissance",
    "Ouvert sur surtension",
    "Ouvert sur délestage",
    "Ouvert sur ordre CPL ou Euridis",
    "Ouvert sur surchauffe (>Imax)",
    "Ouvert sur surchauffe (<Imax)",
];

pub const TARIF_EN_COURS: &[&str] = &[
    "Index 1", "Index 2", "Index 3", "Index 4", "Index 5", "Index 6", "Index 7", "Index 8",
    "Index 9", "Index 10",
];

pub const ETAT_EURIDIS: &[&str] = &[
    "Désactivée",
    "Activée sans sécurité",
    "Valeur non valide",
    "Activée avec sécurité",
];

pub const STATUT_CPL: &[&str] = &["New/Unlock", "New/Lock", "Registered", "Valeur non valide"];

pub const TEMPO_COLOR: &[&str] = &["Pas d'annonce", "Bleu", "Blanc", "Rouge"];

pub const PREAVIS_PM: &[&str] = &[
    "Pas de préavis en cours",
    "Préavis PM1 en cours",
    "Préavis PM2 en cours",
    "Préavis PM3 en cours",
];

pub const POINTE_MOBILE: &[&str] = &[
    "Pas de pointe mobile",
    "PM 1 en cours",
    "PM 2 en cours",
    "PM 3 en cours",
];

/// Position and decoding of one field in the status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Position of the least significant bit.
    pub lsb: u8,
    /// Width in bits.
    pub len: u8,
    /// Labels indexed by field value. `None` for boolean fields.
    pub options: Option<&'static [&'static str]>,
}

impl FieldDescriptor {
    const fn flag(lsb: u8) -> Self {
        FieldDescriptor {
            lsb,
            len: 1,
            options: None,
        }
    }

    const fn labelled(lsb: u8, len: u8, options: &'static [&'static str]) -> Self {
        FieldDescriptor {
            lsb,
            len,
            options: Some(options),
        }
    }

    /// Raw value of the field within `register`.
    pub fn extract(&self, register: u32) -> u32 {
        (register >> self.lsb) & ((1u32 << self.len) - 1)
    }
}

/// Fields of the status register. Bits 5 and 18 are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusRegisterField {
    ContactSec,
    OrganeDeCoupure,
    EtatDuCacheBorneDistributeur,
    SurtensionSurUneDesPhases,
    DepassementPuissanceReference,
    ProducteurConsommateur,
    SensEnergieActive,
    TarifContratFourniture,
    TarifContratDistributeur,
    ModeDegradeHorloge,
    ModeTic,
    EtatSortieCommunicationEuridis,
    StatusCpl,
    SynchroCpl,
    CouleurJourContratTempo,
    CouleurLendemainContratTempo,
    PreavisPointesMobiles,
    PointeMobile,
}

impl StatusRegisterField {
    /// Every field, in bit order.
    pub const ALL: [StatusRegisterField; 18] = [
        StatusRegisterField::ContactSec,
        StatusRegisterField::OrganeDeCoupure,
        StatusRegisterField::EtatDuCacheBorneDistributeur,
        StatusRegisterField::SurtensionSurUneDesPhases,
        StatusRegisterField::DepassementPuissanceReference,
        StatusRegisterField::ProducteurConsommateur,
        StatusRegisterField::SensEnergieActive,
        StatusRegisterField::TarifContratFourniture,
        StatusRegisterField::TarifContratDistributeur,
        StatusRegisterField::ModeDegradeHorloge,
        StatusRegisterField::ModeTic,
        StatusRegisterField::EtatSortieCommunicationEuridis,
        StatusRegisterField::StatusCpl,
        StatusRegisterField::SynchroCpl,
        StatusRegisterField::CouleurJourContratTempo,
        StatusRegisterField::CouleurLendemainContratTempo,
        StatusRegisterField::PreavisPointesMobiles,
        StatusRegisterField::PointeMobile,
    ];

    pub fn descriptor(self) -> FieldDescriptor {
        use StatusRegisterField::*;
        match self {
            ContactSec => FieldDescriptor::flag(0),
            OrganeDeCoupure => FieldDescriptor::labelled(1, 3, ORGANE_COUPURE),
            EtatDuCacheBorneDistributeur => FieldDescriptor::flag(4),
            SurtensionSurUneDesPhases => FieldDescriptor::flag(6),
            DepassementPuissanceReference => FieldDescriptor::flag(7),
            ProducteurConsommateur => FieldDescriptor::flag(8),
            SensEnergieActive => FieldDescriptor::flag(9),
            TarifContratFourniture => FieldDescriptor::labelled(10, 4, TARIF_EN_COURS),
            TarifContratDistributeur => FieldDescriptor::labelled(14, 2, TARIF_EN_COURS),
            ModeDegradeHorloge => FieldDescriptor::flag(16),
            ModeTic => FieldDescriptor::flag(17),
            EtatSortieCommunicationEuridis => FieldDescriptor::labelled(19, 2, ETAT_EURIDIS),
            StatusCpl => FieldDescriptor::labelled(21, 2, STATUT_CPL),
            SynchroCpl => FieldDescriptor::flag(23),
            CouleurJourContratTempo => FieldDescriptor::labelled(24, 2, TEMPO_COLOR),
            CouleurLendemainContratTempo => FieldDescriptor::labelled(26, 2, TEMPO_COLOR),
            PreavisPointesMobiles => FieldDescriptor::labelled(28, 2, PREAVIS_PM),
            PointeMobile => FieldDescriptor::labelled(30, 2, POINTE_MOBILE),
        }
    }

    pub fn name(self) -> &'static str {
        use StatusRegisterField::*;
        match self {
            ContactSec => "CONTACT_SEC",
            OrganeDeCoupure => "ORGANE_DE_COUPURE",
            EtatDuCacheBorneDistributeur => "ETAT_DU_CACHE_BORNE_DISTRIBUTEUR",
            SurtensionSurUneDesPhases => "SURTENSION_SUR_UNE_DES_PHASES",
            DepassementPuissanceReference => "DEPASSEMENT_PUISSANCE_REFERENCE",
            ProducteurConsommateur => "PRODUCTEUR_CONSOMMATEUR",
            SensEnergieActive => "SENS_ENERGIE_ACTIVE",
            TarifContratFourniture => "TARIF_CONTRAT_FOURNITURE",
            TarifContratDistributeur => "TARIF_CONTRAT_DISTRIBUTEUR",
            ModeDegradeHorloge => "MODE_DEGRADE_HORLOGE",
            ModeTic => "MODE_TIC",
            EtatSortieCommunicationEuridis => "ETAT_SORTIE_COMMUNICATION_EURIDIS",
            StatusCpl => "STATUS_CPL",
            SynchroCpl => "SYNCHRO_CPL",
            CouleurJourContratTempo => "COULEUR_JOUR_CONTRAT_TEMPO",
            CouleurLendemainContratTempo => "COULEUR_LENDEMAIN_CONTRAT_TEMPO",
            PreavisPointesMobiles => "PREAVIS_POINTES_MOBILES",
            PointeMobile => "POINTE_MOBILE",
        }
    }
}

impl fmt::Display for StatusRegisterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded value of one status field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StatusValue {
    Flag(bool),
    Label(&'static str),
}

impl fmt::Display for StatusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusValue::Flag(b) => write!(f, "{b}"),
            StatusValue::Label(s) => f.write_str(s),
        }
    }
}

/// Parses the hexadecimal register value.
pub fn parse_register(hex_value: &str) -> Result<u32, TicError> {
    u32::from_str_radix(hex_value.trim(), 16)
        .map_err(|e| TicError::InvalidStatusRegister(format!("{hex_value:?}: {e}")))
}

/// Decodes one field of a status register.
pub fn get_status(hex_value: &str, field: StatusRegisterField) -> Result<StatusValue, TicError> {
    let register = parse_register(hex_value)?;
    decode_field(register, field)
}

fn decode_field(register: u32, field: StatusRegisterField) -> Result<StatusValue, TicError> {
    let descriptor = field.descriptor();
    let value = descriptor.extract(register);
    match descriptor.options {
        None => Ok(StatusValue::Flag(value != 0)),
        Some(labels) => labels
            .get(value as usize)
            .copied()
            .map(StatusValue::Label)
            .ok_or(TicError::UnknownStatusValue {
                field: field.name(),
                value,
            }),
    }
}

/// Decodes every field of a status register, in bit order.
pub fn decode_all(
    hex_value: &str,
) -> Result<Vec<(StatusRegisterField, Result<StatusValue, TicError>)>, TicError> {
    let register = parse_register(hex_value)?;
    Ok(StatusRegisterField::ALL
        .iter()
        .map(|&field| (field, decode_field(register, field)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptors_do_not_overlap() {
        let mut used = 0u32;
        for field in StatusRegisterField::ALL {
            let d = field.descriptor();
            let mask = ((1u32 << d.len) - 1) << d.lsb;
            assert_eq!(used & mask, 0, "{field} overlaps");
            used |= mask;
        }
        // Bits 5 and 18 are reserved.
        assert_eq!(!used, (1 << 5) | (1 << 18));
    }

    #[test]
    fn test_unknown_label() {
        // ORGANE_DE_COUPURE = 7
        let err = get_status("0000000E", StatusRegisterField::OrganeDeCoupure).unwrap_err();
        assert!(matches!(
            err,
            TicError::UnknownStatusValue {
                field: "ORGANE_DE_COUPURE",
                value: 7
            }
        ));
    }

    #[test]
    fn test_invalid_hex() {
        assert!(matches!(
            get_status("XYZ", StatusRegisterField::ContactSec),
            Err(TicError::InvalidStatusRegister(_))
        ));
        assert!(get_status("1FFFFFFFF", StatusRegisterField::ContactSec).is_err());
        assert!(decode_all("").is_err());
    }
}

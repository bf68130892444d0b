use linky_tic::status_register::{
    decode_all, get_status, StatusRegisterField, StatusValue, ETAT_EURIDIS, ORGANE_COUPURE,
    POINTE_MOBILE, PREAVIS_PM, STATUT_CPL, TARIF_EN_COURS, TEMPO_COLOR,
};
use StatusRegisterField::*;
use StatusValue::{Flag, Label};

fn assert_register(register: &str, expected: &[(StatusRegisterField, StatusValue)]) {
    assert_eq!(expected.len(), StatusRegisterField::ALL.len());
    for &(field, value) in expected {
        assert_eq!(
            get_status(register, field).unwrap(),
            value,
            "{register} {field}"
        );
    }
}

#[test]
fn test_register_013ac501() {
    assert_register(
        "013AC501",
        &[
            (ContactSec, Flag(true)),
            (OrganeDeCoupure, Label(ORGANE_COUPURE[0])),
            (EtatDuCacheBorneDistributeur, Flag(false)),
            (SurtensionSurUneDesPhases, Flag(false)),
            (DepassementPuissanceReference, Flag(false)),
            (ProducteurConsommateur, Flag(true)),
            (SensEnergieActive, Flag(false)),
            (TarifContratFourniture, Label(TARIF_EN_COURS[1])),
            (TarifContratDistributeur, Label(TARIF_EN_COURS[3])),
            (ModeDegradeHorloge, Flag(false)),
            (ModeTic, Flag(true)),
            (EtatSortieCommunicationEuridis, Label(ETAT_EURIDIS[3])),
            (StatusCpl, Label(STATUT_CPL[1])),
            (SynchroCpl, Flag(false)),
            (CouleurJourContratTempo, Label(TEMPO_COLOR[1])),
            (CouleurLendemainContratTempo, Label(TEMPO_COLOR[0])),
            (PreavisPointesMobiles, Label(PREAVIS_PM[0])),
            (PointeMobile, Label(POINTE_MOBILE[0])),
        ],
    );
}

#[test]
fn test_register_003ac000() {
    assert_register(
        "003AC000",
        &[
            (ContactSec, Flag(false)),
            (OrganeDeCoupure, Label(ORGANE_COUPURE[0])),
            (EtatDuCacheBorneDistributeur, Flag(false)),
            (SurtensionSurUneDesPhases, Flag(false)),
            (DepassementPuissanceReference, Flag(false)),
            (ProducteurConsommateur, Flag(false)),
            (SensEnergieActive, Flag(false)),
            (TarifContratFourniture, Label(TARIF_EN_COURS[0])),
            (TarifContratDistributeur, Label(TARIF_EN_COURS[3])),
            (ModeDegradeHorloge, Flag(false)),
            (ModeTic, Flag(true)),
            (EtatSortieCommunicationEuridis, Label(ETAT_EURIDIS[3])),
            (StatusCpl, Label(STATUT_CPL[1])),
            (SynchroCpl, Flag(false)),
            (CouleurJourContratTempo, Label(TEMPO_COLOR[0])),
            (CouleurLendemainContratTempo, Label(TEMPO_COLOR[0])),
            (PreavisPointesMobiles, Label(PREAVIS_PM[0])),
            (PointeMobile, Label(POINTE_MOBILE[0])),
        ],
    );
}

#[test]
fn test_register_ffdfe7fd() {
    assert_register(
        "FFDFE7FD",
        &[
            (ContactSec, Flag(true)),
            (OrganeDeCoupure, Label(ORGANE_COUPURE[6])),
            (EtatDuCacheBorneDistributeur, Flag(true)),
            (SurtensionSurUneDesPhases, Flag(true)),
            (DepassementPuissanceReference, Flag(true)),
            (ProducteurConsommateur, Flag(true)),
            (SensEnergieActive, Flag(true)),
            (TarifContratFourniture, Label(TARIF_EN_COURS[9])),
            (TarifContratDistributeur, Label(TARIF_EN_COURS[3])),
            (ModeDegradeHorloge, Flag(true)),
            (ModeTic, Flag(true)),
            (EtatSortieCommunicationEuridis, Label(ETAT_EURIDIS[3])),
            (StatusCpl, Label(STATUT_CPL[2])),
            (SynchroCpl, Flag(true)),
            (CouleurJourContratTempo, Label(TEMPO_COLOR[3])),
            (CouleurLendemainContratTempo, Label(TEMPO_COLOR[3])),
            (PreavisPointesMobiles, Label(PREAVIS_PM[3])),
            (PointeMobile, Label(POINTE_MOBILE[3])),
        ],
    );
}

#[test]
fn test_lowercase_hex_is_accepted() {
    assert_eq!(
        get_status("013ac501", TarifContratFourniture).unwrap(),
        Label("Index 2")
    );
}

#[test]
fn test_decode_all_keeps_going_after_unknown_value() {
    // TARIF_CONTRAT_FOURNITURE = 15 has no label.
    let fields = decode_all("00003C00").unwrap();
    assert_eq!(fields.len(), 18);
    for (field, value) in fields {
        if field == TarifContratFourniture {
            assert!(value.is_err());
        } else {
            assert!(value.is_ok(), "{field}");
        }
    }
}

#[test]
fn test_value_display() {
    assert_eq!(Flag(true).to_string(), "true");
    assert_eq!(Label("Bleu").to_string(), "Bleu");
    assert_eq!(PointeMobile.to_string(), "POINTE_MOBILE");
}

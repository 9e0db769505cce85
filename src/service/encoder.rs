//! Employee record to model feature row
//!
//! Encoding rules:
//! - numeric fields keep their name and value
//! - `frequence_deplacement` is ordinal: Aucun=0, Occasionnel=1, Frequent=2
//! - `heure_supplementaires` (Oui=1) and `genre` (M=1) are binary
//! - `statut_marital` is one-hot with Célibataire as reference
//! - `departement` only emits `departement_Consulting` (Finance is reference)
//! - `poste` emits one column per role, `domaine_etude` one per field of
//!   study except Sciences (reference)
//!
//! The computed row is then reconciled against the [`FeatureSchema`]: missing
//! columns are zero, unknown columns are dropped, order is the schema's.

use std::collections::HashMap;

use crate::model::{
    Department, EmployeeRecord, FieldOfStudy, Gender, JobRole, MaritalStatus, Overtime,
    TravelFrequency,
};

use super::schema::FeatureSchema;

/// Field of study absorbed by the intercept, no column of its own
const REFERENCE_FIELD_OF_STUDY: FieldOfStudy = FieldOfStudy::Sciences;

/// One model input row, columns identical to the schema it was built for
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    schema: FeatureSchema,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Encode a record into the row expected by the model
pub fn encode(record: &EmployeeRecord, schema: &FeatureSchema) -> FeatureVector {
    reconcile(encoded_row(record), schema)
}

/// Align a computed row with the schema
fn reconcile(row: Vec<(String, f64)>, schema: &FeatureSchema) -> FeatureVector {
    let computed: HashMap<String, f64> = row.into_iter().collect();

    let values = schema
        .columns()
        .iter()
        .map(|column| computed.get(column).copied().unwrap_or(0.0))
        .collect();

    FeatureVector {
        schema: schema.clone(),
        values,
    }
}

/// Column names produced by the encoder, before reconciliation
///
/// The set is the same for every record.
pub fn encoded_columns() -> Vec<String> {
    let reference = EmployeeRecord {
        age: 0,
        revenu_mensuel: 0.0,
        heure_supplementaires: Overtime::No,
        satisfaction_employee_environnement: Default::default(),
        frequence_deplacement: TravelFrequency::None,
        genre: Default::default(),
        statut_marital: Default::default(),
        departement: Default::default(),
        poste: Default::default(),
        domaine_etude: Default::default(),
        nombre_experiences_precedentes: 0,
        annee_experience_totale: 0,
        annees_dans_l_entreprise: 0,
        annees_dans_le_poste_actuel: 0,
        note_evaluation_precedente: 0.0,
        satisfaction_employee_nature_travail: Default::default(),
        satisfaction_employee_equipe: Default::default(),
        satisfaction_employee_equilibre_pro_perso: Default::default(),
        note_evaluation_actuelle: 0.0,
        augmentation_salaire_precedente: 0.0,
        nombre_participation_pee: 0,
        nb_formations_suivies: 0,
        distance_domicile_travail: 0.0,
        niveau_education: Default::default(),
        annees_depuis_la_derniere_promotion: 0,
    };

    encoded_row(&reference)
        .into_iter()
        .map(|(column, _)| column)
        .collect()
}

/// Schema columns the encoder never produces; they are always zero
pub fn unencoded_columns(schema: &FeatureSchema) -> Vec<String> {
    let produced = encoded_columns();
    schema
        .columns()
        .iter()
        .filter(|column| !produced.contains(column))
        .cloned()
        .collect()
}

fn encoded_row(record: &EmployeeRecord) -> Vec<(String, f64)> {
    let mut row: Vec<(String, f64)> = vec![
        numeric("age", record.age as f64),
        numeric("revenu_mensuel", record.revenu_mensuel),
        numeric(
            "satisfaction_employee_environnement",
            record.satisfaction_employee_environnement.value().into(),
        ),
        numeric(
            "nombre_experiences_precedentes",
            record.nombre_experiences_precedentes as f64,
        ),
        numeric("annee_experience_totale", record.annee_experience_totale as f64),
        numeric("annees_dans_l_entreprise", record.annees_dans_l_entreprise as f64),
        numeric(
            "annees_dans_le_poste_actuel",
            record.annees_dans_le_poste_actuel as f64,
        ),
        numeric("note_evaluation_precedente", record.note_evaluation_precedente),
        numeric(
            "satisfaction_employee_nature_travail",
            record.satisfaction_employee_nature_travail.value().into(),
        ),
        numeric(
            "satisfaction_employee_equipe",
            record.satisfaction_employee_equipe.value().into(),
        ),
        numeric(
            "satisfaction_employee_equilibre_pro_perso",
            record.satisfaction_employee_equilibre_pro_perso.value().into(),
        ),
        numeric("note_evaluation_actuelle", record.note_evaluation_actuelle),
        numeric(
            "augmentation_salaire_precedente",
            record.augmentation_salaire_precedente,
        ),
        numeric("nombre_participation_pee", record.nombre_participation_pee as f64),
        numeric("nb_formations_suivies", record.nb_formations_suivies as f64),
        numeric("distance_domicile_travail", record.distance_domicile_travail),
        numeric("niveau_education", record.niveau_education.value().into()),
        numeric(
            "annees_depuis_la_derniere_promotion",
            record.annees_depuis_la_derniere_promotion as f64,
        ),
        numeric(
            "frequence_deplacement_encoded",
            travel_frequency_rank(record.frequence_deplacement),
        ),
        numeric(
            "heure_supplementaires_encoded",
            flag(record.heure_supplementaires == Overtime::Yes),
        ),
        numeric("genre_encoded", flag(record.genre == Gender::M)),
        one_hot("statut_marital", MaritalStatus::Divorced, record.statut_marital),
        one_hot("statut_marital", MaritalStatus::Married, record.statut_marital),
        one_hot("departement", Department::Consulting, record.departement),
    ];

    row.extend(
        JobRole::ALL
            .iter()
            .map(|role| one_hot("poste", *role, record.poste)),
    );
    row.extend(
        FieldOfStudy::ALL
            .iter()
            .filter(|field| **field != REFERENCE_FIELD_OF_STUDY)
            .map(|field| one_hot("domaine_etude", *field, record.domaine_etude)),
    );

    row
}

fn travel_frequency_rank(frequency: TravelFrequency) -> f64 {
    match frequency {
        TravelFrequency::None => 0.0,
        TravelFrequency::Occasional => 1.0,
        TravelFrequency::Frequent => 2.0,
    }
}

fn flag(set: bool) -> f64 {
    if set { 1.0 } else { 0.0 }
}

fn numeric(column: &str, value: f64) -> (String, f64) {
    (column.to_string(), value)
}

fn one_hot<T>(prefix: &str, category: T, actual: T) -> (String, f64)
where
    T: PartialEq + std::fmt::Display,
{
    (format!("{}_{}", prefix, category), flag(category == actual))
}

//! Validated employee record accepted by the prediction endpoint
//!
//! Every categorical field is a closed enum and every bounded integer a
//! newtype, so a record that deserializes successfully is valid by
//! construction. The encoder relies on this and never re-validates.

use std::fmt;

use serde::Deserialize;
use utoipa::ToSchema;

/// Overtime flag (`heure_supplementaires`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
pub enum Overtime {
    #[serde(rename = "Oui")]
    Yes,
    #[serde(rename = "Non")]
    No,
}

/// Business travel frequency (`frequence_deplacement`), an ordinal scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
pub enum TravelFrequency {
    #[serde(rename = "Aucun")]
    None,
    #[serde(rename = "Occasionnel")]
    Occasional,
    #[serde(rename = "Frequent")]
    Frequent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
pub enum Gender {
    #[default]
    M,
    F,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
pub enum MaritalStatus {
    #[default]
    #[serde(rename = "Célibataire")]
    Single,
    #[serde(rename = "Marié(e)")]
    Married,
    #[serde(rename = "Divorcé(e)")]
    Divorced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
pub enum Department {
    #[serde(rename = "Consulting")]
    Consulting,
    #[default]
    #[serde(rename = "Finance")]
    Finance,
    #[serde(rename = "Recherche & Développement")]
    ResearchAndDevelopment,
    #[serde(rename = "Ressources Humaines")]
    HumanResources,
    #[serde(rename = "Ventes")]
    Sales,
}

/// Job title (`poste`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
pub enum JobRole {
    #[serde(rename = "Cadre Commercial")]
    SalesExecutive,
    #[default]
    #[serde(rename = "Consultant")]
    Consultant,
    #[serde(rename = "Directeur Technique")]
    TechnicalDirector,
    #[serde(rename = "Manager")]
    Manager,
    #[serde(rename = "Représentant Commercial")]
    SalesRepresentative,
    #[serde(rename = "Ressources Humaines")]
    HumanResources,
    #[serde(rename = "Senior Manager")]
    SeniorManager,
    #[serde(rename = "Tech Lead")]
    TechLead,
}

/// Field of study (`domaine_etude`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
pub enum FieldOfStudy {
    #[serde(rename = "Entrepreunariat")]
    Entrepreneurship,
    #[serde(rename = "Infra & Cloud")]
    InfraAndCloud,
    #[serde(rename = "Marketing")]
    Marketing,
    #[serde(rename = "Ressources Humaines")]
    HumanResources,
    #[default]
    #[serde(rename = "Sciences")]
    Sciences,
    #[serde(rename = "Transformation Digitale")]
    DigitalTransformation,
}

macro_rules! wire_names {
    (@names $ty:ty { $($variant:ident => $name:literal),+ }) => {
        impl $ty {
            /// Value as it appears on the wire and in the feature column names
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
    // Categories expanded into one-hot columns need their full variant list
    (one_hot $ty:ty { $($variant:ident => $name:literal),+ $(,)? }) => {
        wire_names!(@names $ty { $($variant => $name),+ });

        impl $ty {
            /// Every variant, in declaration order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];
        }
    };
    ($ty:ty { $($variant:ident => $name:literal),+ $(,)? }) => {
        wire_names!(@names $ty { $($variant => $name),+ });

        #[cfg(test)]
        impl $ty {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];
        }
    };
}

wire_names!(Overtime { Yes => "Oui", No => "Non" });
wire_names!(TravelFrequency {
    None => "Aucun",
    Occasional => "Occasionnel",
    Frequent => "Frequent",
});
wire_names!(Gender { M => "M", F => "F" });
wire_names!(MaritalStatus {
    Single => "Célibataire",
    Married => "Marié(e)",
    Divorced => "Divorcé(e)",
});
wire_names!(Department {
    Consulting => "Consulting",
    Finance => "Finance",
    ResearchAndDevelopment => "Recherche & Développement",
    HumanResources => "Ressources Humaines",
    Sales => "Ventes",
});
wire_names!(one_hot JobRole {
    SalesExecutive => "Cadre Commercial",
    Consultant => "Consultant",
    TechnicalDirector => "Directeur Technique",
    Manager => "Manager",
    SalesRepresentative => "Représentant Commercial",
    HumanResources => "Ressources Humaines",
    SeniorManager => "Senior Manager",
    TechLead => "Tech Lead",
});
wire_names!(one_hot FieldOfStudy {
    Entrepreneurship => "Entrepreunariat",
    InfraAndCloud => "Infra & Cloud",
    Marketing => "Marketing",
    HumanResources => "Ressources Humaines",
    Sciences => "Sciences",
    DigitalTransformation => "Transformation Digitale",
});

/// Satisfaction score on a 1-4 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "i64")]
pub struct Satisfaction(u8);

impl Satisfaction {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Satisfaction {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        bounded(value, Self::MIN, Self::MAX, "satisfaction score").map(Self)
    }
}

impl Default for Satisfaction {
    fn default() -> Self {
        Self(3)
    }
}

/// Education level on a 1-5 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "i64")]
pub struct EducationLevel(u8);

impl EducationLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for EducationLevel {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        bounded(value, Self::MIN, Self::MAX, "education level").map(Self)
    }
}

impl Default for EducationLevel {
    fn default() -> Self {
        Self(3)
    }
}

fn bounded(value: i64, min: u8, max: u8, what: &str) -> Result<u8, String> {
    if value < i64::from(min) || value > i64::from(max) {
        return Err(format!(
            "{} must be between {} and {}, got {}",
            what, min, max, value
        ));
    }
    Ok(value as u8)
}

/// Employee features submitted for an attrition prediction
///
/// Field names are the ones the model was trained on. Only the first five
/// fields are required; the rest default to the values of a typical employee.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct EmployeeRecord {
    #[schema(example = 35)]
    pub age: i64,
    #[schema(example = 5000.0)]
    pub revenu_mensuel: f64,
    pub heure_supplementaires: Overtime,
    #[schema(value_type = u8, minimum = 1, maximum = 4, example = 3)]
    pub satisfaction_employee_environnement: Satisfaction,
    pub frequence_deplacement: TravelFrequency,

    #[serde(default)]
    pub genre: Gender,
    #[serde(default)]
    pub statut_marital: MaritalStatus,
    #[serde(default)]
    pub departement: Department,
    #[serde(default)]
    pub poste: JobRole,
    #[serde(default)]
    pub domaine_etude: FieldOfStudy,
    #[serde(default = "defaults::previous_experiences")]
    pub nombre_experiences_precedentes: i64,
    #[serde(default = "defaults::total_experience_years")]
    pub annee_experience_totale: i64,
    #[serde(default = "defaults::years_at_company")]
    pub annees_dans_l_entreprise: i64,
    #[serde(default = "defaults::years_in_role")]
    pub annees_dans_le_poste_actuel: i64,
    #[serde(default = "defaults::evaluation_score")]
    pub note_evaluation_precedente: f64,
    #[serde(default)]
    #[schema(value_type = u8, minimum = 1, maximum = 4)]
    pub satisfaction_employee_nature_travail: Satisfaction,
    #[serde(default)]
    #[schema(value_type = u8, minimum = 1, maximum = 4)]
    pub satisfaction_employee_equipe: Satisfaction,
    #[serde(default)]
    #[schema(value_type = u8, minimum = 1, maximum = 4)]
    pub satisfaction_employee_equilibre_pro_perso: Satisfaction,
    #[serde(default = "defaults::evaluation_score")]
    pub note_evaluation_actuelle: f64,
    #[serde(default = "defaults::previous_raise_percent")]
    pub augmentation_salaire_precedente: f64,
    #[serde(default = "defaults::savings_plan_participations")]
    pub nombre_participation_pee: i64,
    #[serde(default = "defaults::trainings_followed")]
    pub nb_formations_suivies: i64,
    #[serde(default = "defaults::commute_distance")]
    pub distance_domicile_travail: f64,
    #[serde(default)]
    #[schema(value_type = u8, minimum = 1, maximum = 5)]
    pub niveau_education: EducationLevel,
    #[serde(default = "defaults::years_since_promotion")]
    pub annees_depuis_la_derniere_promotion: i64,
}

mod defaults {
    pub fn previous_experiences() -> i64 {
        2
    }

    pub fn total_experience_years() -> i64 {
        10
    }

    pub fn years_at_company() -> i64 {
        5
    }

    pub fn years_in_role() -> i64 {
        3
    }

    pub fn evaluation_score() -> f64 {
        3.5
    }

    pub fn previous_raise_percent() -> f64 {
        10.0
    }

    pub fn savings_plan_participations() -> i64 {
        2
    }

    pub fn trainings_followed() -> i64 {
        3
    }

    pub fn commute_distance() -> f64 {
        10.0
    }

    pub fn years_since_promotion() -> i64 {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reference_payload() -> serde_json::Value {
        json!({
            "age": 35,
            "revenu_mensuel": 5000.0,
            "heure_supplementaires": "Oui",
            "satisfaction_employee_environnement": 2,
            "frequence_deplacement": "Frequent"
        })
    }

    #[test]
    fn test_minimal_payload_fills_defaults() {
        let record: EmployeeRecord = serde_json::from_value(reference_payload()).unwrap();

        assert_eq!(record.heure_supplementaires, Overtime::Yes);
        assert_eq!(record.frequence_deplacement, TravelFrequency::Frequent);
        assert_eq!(record.satisfaction_employee_environnement.value(), 2);
        assert_eq!(record.genre, Gender::M);
        assert_eq!(record.statut_marital, MaritalStatus::Single);
        assert_eq!(record.departement, Department::Finance);
        assert_eq!(record.poste, JobRole::Consultant);
        assert_eq!(record.domaine_etude, FieldOfStudy::Sciences);
        assert_eq!(record.annee_experience_totale, 10);
        assert_eq!(record.niveau_education.value(), 3);
        assert_eq!(record.distance_domicile_travail, 10.0);
    }

    #[test]
    fn test_accented_wire_values() {
        let mut payload = reference_payload();
        payload["statut_marital"] = json!("Divorcé(e)");
        payload["departement"] = json!("Recherche & Développement");
        payload["poste"] = json!("Représentant Commercial");
        payload["domaine_etude"] = json!("Infra & Cloud");

        let record: EmployeeRecord = serde_json::from_value(payload).unwrap();
        assert_eq!(record.statut_marital, MaritalStatus::Divorced);
        assert_eq!(record.departement, Department::ResearchAndDevelopment);
        assert_eq!(record.poste, JobRole::SalesRepresentative);
        assert_eq!(record.domaine_etude, FieldOfStudy::InfraAndCloud);
    }

    #[test]
    fn test_rejects_out_of_range_satisfaction() {
        let mut payload = reference_payload();
        payload["satisfaction_employee_environnement"] = json!(10);

        let err = serde_json::from_value::<EmployeeRecord>(payload).unwrap_err();
        assert!(err.to_string().contains("between 1 and 4"));
    }

    #[test]
    fn test_rejects_out_of_range_education() {
        let mut payload = reference_payload();
        payload["niveau_education"] = json!(0);

        assert!(serde_json::from_value::<EmployeeRecord>(payload).is_err());
    }

    #[test]
    fn test_rejects_unknown_enum_value() {
        let mut payload = reference_payload();
        payload["heure_supplementaires"] = json!("Maybe");

        assert!(serde_json::from_value::<EmployeeRecord>(payload).is_err());
    }

    #[test]
    fn test_rejects_missing_required_field() {
        let mut payload = reference_payload();
        payload.as_object_mut().unwrap().remove("revenu_mensuel");

        let err = serde_json::from_value::<EmployeeRecord>(payload).unwrap_err();
        assert!(err.to_string().contains("revenu_mensuel"));
    }

    #[test]
    fn test_wire_names_match_serde() {
        for role in JobRole::ALL {
            let decoded: JobRole = serde_json::from_value(json!(role.as_str())).unwrap();
            assert_eq!(decoded, *role);
        }
        for field in FieldOfStudy::ALL {
            let decoded: FieldOfStudy = serde_json::from_value(json!(field.as_str())).unwrap();
            assert_eq!(decoded, *field);
        }
        for status in MaritalStatus::ALL {
            let decoded: MaritalStatus = serde_json::from_value(json!(status.as_str())).unwrap();
            assert_eq!(decoded, *status);
        }
        for department in Department::ALL {
            let decoded: Department = serde_json::from_value(json!(department.as_str())).unwrap();
            assert_eq!(decoded, *department);
        }
    }

    #[test]
    fn test_ignores_unknown_fields() {
        let mut payload = reference_payload();
        payload["matricule"] = json!("E-1042");
        payload["commentaire_manager"] = json!({"note": "RAS"});

        let record: EmployeeRecord = serde_json::from_value(payload).unwrap();
        let reference: EmployeeRecord = serde_json::from_value(reference_payload()).unwrap();
        assert_eq!(record, reference);
    }
}

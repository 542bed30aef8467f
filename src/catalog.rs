//! Static exam-test and clinical-case catalogs.
//!
//! Read-only reference data consumed by the exploration engine. The engine
//! filters tests by region and resolves ids; it never mutates these tables.

use serde::Serialize;

use crate::anatomy::Region;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExamCategory {
    MentalState,
    CranialNerve,
    Motor,
    Reflex,
    Sensory,
    CoordinationGait,
}

impl ExamCategory {
    pub fn display(&self) -> &'static str {
        match self {
            ExamCategory::MentalState => "Estado Mental",
            ExamCategory::CranialNerve => "Nervios Craneales",
            ExamCategory::Motor => "Examen Motor",
            ExamCategory::Reflex => "Reflejos",
            ExamCategory::Sensory => "Examen Sensorial",
            ExamCategory::CoordinationGait => "Coordinación y Marcha",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamTest {
    pub id: &'static str,
    pub name: &'static str,
    pub category: ExamCategory,
    pub region: Region,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClinicalCase {
    pub id: &'static str,
    pub title: &'static str,
    pub patient_profile: &'static str,
    pub findings: &'static str,
    pub target_region: Region,
    pub correct_test_id: &'static str,
}

pub const CLINICAL_TESTS: &[ExamTest] = &[
    // Estado mental y funciones superiores
    ExamTest {
        id: "mental-orientation",
        name: "Orientación y Atención",
        category: ExamCategory::MentalState,
        region: Region::Head,
        description: "Evaluación de corteza prefrontal y sistema activador reticular.",
    },
    ExamTest {
        id: "mental-language",
        name: "Lenguaje (Fluidez/Comprensión)",
        category: ExamCategory::MentalState,
        region: Region::Head,
        description: "Evaluación de áreas de Broca (44, 45) y Wernicke (22).",
    },
    ExamTest {
        id: "mental-memory",
        name: "Memoria Reciente",
        category: ExamCategory::MentalState,
        region: Region::Head,
        description: "Integridad del circuito de Papez e hipocampo.",
    },
    // Pares craneales I-XII
    ExamTest {
        id: "cn1-olfactory",
        name: "CN I: Olfatorio",
        category: ExamCategory::CranialNerve,
        region: Region::Head,
        description: "Prueba de sustancias no irritantes por narina.",
    },
    ExamTest {
        id: "cn2-optic",
        name: "CN II: Agudeza y Campos",
        category: ExamCategory::CranialNerve,
        region: Region::Head,
        description: "Campos por confrontación y fondo de ojo.",
    },
    ExamTest {
        id: "cn3-4-6-ocular",
        name: "CN III, IV, VI: Motilidad Ocular",
        category: ExamCategory::CranialNerve,
        region: Region::Head,
        description: "Seguimiento en H y reflejos pupilares.",
    },
    ExamTest {
        id: "cn5-trigeminal",
        name: "CN V: Sensibilidad y Masticación",
        category: ExamCategory::CranialNerve,
        region: Region::Head,
        description: "V1, V2, V3 y músculos temporal/masetero.",
    },
    ExamTest {
        id: "cn7-facial",
        name: "CN VII: Mímica Facial",
        category: ExamCategory::CranialNerve,
        region: Region::Head,
        description: "Simetría al sonreír, cerrar ojos y arrugar frente.",
    },
    ExamTest {
        id: "cn8-vestibulocochlear",
        name: "CN VIII: Audición y Vestibular",
        category: ExamCategory::CranialNerve,
        region: Region::Head,
        description: "Prueba de susurro, Weber/Rinne y maniobra de Dix-Hallpike.",
    },
    ExamTest {
        id: "cn9-10-vagus",
        name: "CN IX, X: Paladar y Fonación",
        category: ExamCategory::CranialNerve,
        region: Region::Head,
        description: "Elevación de la úvula y reflejo nauseoso.",
    },
    ExamTest {
        id: "cn11-accessory",
        name: "CN XI: Espinal Accesorio",
        category: ExamCategory::CranialNerve,
        region: Region::Head,
        description: "Encogimiento de hombros (Trapecio) y rotación de cuello (ECM).",
    },
    ExamTest {
        id: "cn12-hypoglossal",
        name: "CN XII: Hipogloso",
        category: ExamCategory::CranialNerve,
        region: Region::Head,
        description: "Protrusión de la lengua y búsqueda de atrofia/fasciculaciones.",
    },
    // Examen motor y reflejos
    ExamTest {
        id: "motor-bulk-tone",
        name: "Inspección y Tono",
        category: ExamCategory::Motor,
        region: Region::Arm,
        description: "Búsqueda de atrofia, fasciculaciones y rigidez/espasticidad.",
    },
    ExamTest {
        id: "motor-power-upper",
        name: "Fuerza Segmentaria MS",
        category: ExamCategory::Motor,
        region: Region::Arm,
        description: "Evaluación de deltoides (C5), bíceps (C5-6), tríceps (C7), interóseos (T1).",
    },
    ExamTest {
        id: "reflex-dtr-upper",
        name: "DTR Miembros Superiores",
        category: ExamCategory::Reflex,
        region: Region::Arm,
        description: "Bicipital (C5), Estilorradial (C6), Tricipital (C7).",
    },
    // Sensibilidad
    ExamTest {
        id: "sensory-modalities",
        name: "Modalidades Primarias",
        category: ExamCategory::Sensory,
        region: Region::Torso,
        description: "Dolor (vía anterolateral) vs Vibración/Posición (Columnas posteriores).",
    },
    ExamTest {
        id: "sensory-cortical",
        name: "Sensibilidad Cortical",
        category: ExamCategory::Sensory,
        region: Region::Arm,
        description: "Estereognosia, grafestesia y extinción sensorial.",
    },
    // Coordinación y marcha
    ExamTest {
        id: "coord-appendicular",
        name: "Pruebas Cerebelosas",
        category: ExamCategory::CoordinationGait,
        region: Region::Leg,
        description: "Dedo-nariz, talón-rodilla y movimientos alternantes rápidos.",
    },
    ExamTest {
        id: "gait-analysis",
        name: "Análisis de la Marcha",
        category: ExamCategory::CoordinationGait,
        region: Region::Foot,
        description: "Base de sustentación, balanceo de brazos, tándem y marcha en talones/puntas.",
    },
];

pub const CLINICAL_CASES: &[ClinicalCase] = &[
    ClinicalCase {
        id: "case-uncal",
        title: "Herniación Uncal Inminente",
        patient_profile: "Paciente con trauma craneal, disminución de alerta y midriasis derecha.",
        findings: "Pupila derecha dilatada y no reactiva a la luz.",
        target_region: Region::Head,
        correct_test_id: "cn3-4-6-ocular",
    },
    ClinicalCase {
        id: "case-weber",
        title: "Síndrome de Weber (Mesencéfalo)",
        patient_profile: "Varón con hemiparesia izquierda y ptosis palpebral derecha con ojo \"fuera y abajo\".",
        findings: "Lesión ipsilateral del III par con debilidad contralateral.",
        target_region: Region::Head,
        correct_test_id: "cn3-4-6-ocular",
    },
    ClinicalCase {
        id: "case-bell",
        title: "Parálisis de Bell vs ACV",
        patient_profile: "Paciente no puede cerrar el ojo ni arrugar la frente del lado izquierdo.",
        findings: "Afectación de toda la hemicara izquierda (lesión periférica del VII).",
        target_region: Region::Head,
        correct_test_id: "cn7-facial",
    },
    ClinicalCase {
        id: "case-bulbar",
        title: "Síndrome Bulbar Lateral (Wallenberg)",
        patient_profile: "Mujer con vértigo, disfagia y pérdida de sensibilidad cruzada.",
        findings: "Desviación de la úvula y pérdida de reflejo nauseoso.",
        target_region: Region::Head,
        correct_test_id: "cn9-10-vagus",
    },
];

/// Read-only view over the static tables.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    tests: &'static [ExamTest],
    cases: &'static [ClinicalCase],
}

impl Catalog {
    pub fn builtin() -> Self {
        Self { tests: CLINICAL_TESTS, cases: CLINICAL_CASES }
    }

    #[cfg(test)]
    pub(crate) fn with_tables(tests: &'static [ExamTest], cases: &'static [ClinicalCase]) -> Self {
        Self { tests, cases }
    }

    pub fn tests(&self) -> &'static [ExamTest] {
        self.tests
    }

    pub fn cases(&self) -> &'static [ClinicalCase] {
        self.cases
    }

    pub fn test_by_id(&self, id: &str) -> Option<&'static ExamTest> {
        self.tests.iter().find(|t| t.id == id)
    }

    pub fn case_by_id(&self, id: &str) -> Option<&'static ClinicalCase> {
        self.cases.iter().find(|c| c.id == id)
    }

    pub fn tests_for_region(&self, region: Region) -> Vec<&'static ExamTest> {
        self.tests.iter().filter(|t| t.region == region).collect()
    }
}

//! Body regions of the exploration diagram and the structure→region
//! keyword classifier.
//!
//! The classifier is an ordered table scan, not a map: keyword sets overlap
//! (a lower-limb reflex name can contain a trunk substring), so declaration
//! order is the priority order and the first matching set wins.

use serde::{Deserialize, Serialize};

/// A zone of the anatomical diagram. Each region doubles as one step of the
/// five-step neurological exam sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Head,
    Arm,
    Torso,
    Leg,
    Foot,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Head => "head",
            Region::Arm => "arm",
            Region::Torso => "torso",
            Region::Leg => "leg",
            Region::Foot => "foot",
        }
    }

    pub fn parse(s: &str) -> Option<Region> {
        match s {
            "head" => Some(Region::Head),
            "arm" => Some(Region::Arm),
            "torso" => Some(Region::Torso),
            "leg" => Some(Region::Leg),
            "foot" => Some(Region::Foot),
            _ => None,
        }
    }

    /// Roman ordinal of the exam step this region anchors.
    pub fn exam_step(&self) -> &'static str {
        match self {
            Region::Head => "I",
            Region::Arm => "II",
            Region::Torso => "III",
            Region::Leg => "IV",
            Region::Foot => "V",
        }
    }

    pub fn exam_label(&self) -> &'static str {
        match self {
            Region::Head => "Mental / Pares Craneales",
            Region::Arm => "Motor MS / Reflejos",
            Region::Torso => "Sensibilidad / Dermatomas",
            Region::Leg => "Motor MI / Coordinación",
            Region::Foot => "Marcha / Estación",
        }
    }
}

/// Visualization layer of the diagram. Pure display state, never guarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    #[default]
    Skin,
    Muscle,
    Nerve,
    Tract,
}

impl Layer {
    pub fn parse(s: &str) -> Option<Layer> {
        match s {
            "skin" => Some(Layer::Skin),
            "muscle" => Some(Layer::Muscle),
            "nerve" => Some(Layer::Nerve),
            "tract" => Some(Layer::Tract),
            _ => None,
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            Layer::Skin => "Piel",
            Layer::Muscle => "Músculos",
            Layer::Nerve => "Nervios",
            Layer::Tract => "Vías de Tractos Largos",
        }
    }
}

// Priority order: cranial/cortical, upper limb, spinal/trunk, lower limb,
// foot/gait. Extend sets in place; never reorder.
const REGION_KEYWORDS: &[(&[&str], Region)] = &[
    (
        &["corteza", "mesencéfalo", "puente", "bulbo", "giro", "ojo", "par craneal", "núcleo"],
        Region::Head,
    ),
    (&["brazo", "mano", "braquial", "bíceps", "tríceps"], Region::Arm),
    (&["médula", "dermatoma", "torácico", "abdominal"], Region::Torso),
    (&["pierna", "femoral", "ciático", "aquiliano"], Region::Leg),
    (&["pie", "marcha", "tándem"], Region::Foot),
];

/// Map a free-text structure name to a diagram region.
///
/// Total and infallible: unmatched names fall back to `Head` (the diagram's
/// control-center slot). That silently mislabels structures outside the five
/// anticipated families; downstream highlighting depends on the fallback, so
/// it stays.
pub fn classify(structure_name: &str) -> Region {
    let name = structure_name.to_lowercase();
    for (keywords, region) in REGION_KEYWORDS {
        if keywords.iter().any(|k| name.contains(k)) {
            return *region;
        }
    }
    Region::Head
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cranial_terms_map_to_head() {
        assert_eq!(classify("Núcleo Rojo"), Region::Head);
        assert_eq!(classify("Corteza Motora Primaria"), Region::Head);
        assert_eq!(classify("par craneal VII"), Region::Head);
    }

    #[test]
    fn match_is_case_insensitive_with_accents() {
        assert_eq!(classify("MESENCÉFALO"), Region::Head);
        assert_eq!(classify("Reflejo BICIPITAL del bíceps"), Region::Arm);
    }

    #[test]
    fn limb_and_trunk_terms() {
        assert_eq!(classify("Plexo Braquial"), Region::Arm);
        assert_eq!(classify("Dermatoma T4"), Region::Torso);
        assert_eq!(classify("Nervio Ciático"), Region::Leg);
        assert_eq!(classify("Marcha en Tándem"), Region::Foot);
    }

    #[test]
    fn declaration_order_breaks_overlaps() {
        // "aquiliano" (lower limb) is declared before the foot set, so a
        // reflex name mentioning the foot still lands on the leg.
        assert_eq!(classify("Reflejo Aquiliano del pie"), Region::Leg);
        // Cranial set outranks everything.
        assert_eq!(classify("Núcleo del nervio femoral"), Region::Head);
    }

    #[test]
    fn unmatched_name_falls_back_to_head() {
        // Known heuristic limitation: names outside the five keyword
        // families are labeled Head rather than an explicit unknown.
        assert_eq!(classify("Asta Anterior C8"), Region::Head);
        assert_eq!(classify(""), Region::Head);
    }
}

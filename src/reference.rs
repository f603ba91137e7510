//! Static lookup tables for symptoms, moods and cycle phases.

use crate::models::{EnergyLevel, FlowIntensity, Mood, Phase, Symptom, TrainingIntensity};

pub struct SymptomInfo {
    pub symptom: Symptom,
    pub label: &'static str,
    pub phases: &'static [Phase],
}

impl SymptomInfo {
    pub fn occurs_in(&self, phase: Phase) -> bool {
        self.phases.contains(&phase)
    }
}

pub const SYMPTOM_COUNT: usize = 12;

/// All trackable symptoms, in display order.
pub static SYMPTOMS: [SymptomInfo; SYMPTOM_COUNT] = [
    SymptomInfo {
        symptom: Symptom::Cramps,
        label: "Cramps",
        phases: &[Phase::Menstrual, Phase::Luteal],
    },
    SymptomInfo {
        symptom: Symptom::Headache,
        label: "Headache",
        phases: &[Phase::Menstrual, Phase::Luteal],
    },
    SymptomInfo {
        symptom: Symptom::Bloating,
        label: "Bloating",
        phases: &[Phase::Luteal, Phase::Menstrual],
    },
    SymptomInfo {
        symptom: Symptom::Fatigue,
        label: "Fatigue",
        phases: &[Phase::Menstrual, Phase::Luteal],
    },
    SymptomInfo {
        symptom: Symptom::Acne,
        label: "Acne",
        phases: &[Phase::Luteal],
    },
    SymptomInfo {
        symptom: Symptom::Backpain,
        label: "Back pain",
        phases: &[Phase::Menstrual],
    },
    SymptomInfo {
        symptom: Symptom::BreastTenderness,
        label: "Breast tenderness",
        phases: &[Phase::Luteal, Phase::Ovulation],
    },
    SymptomInfo {
        symptom: Symptom::MoodSwings,
        label: "Mood swings",
        phases: &[Phase::Luteal, Phase::Menstrual],
    },
    SymptomInfo {
        symptom: Symptom::Cravings,
        label: "Cravings",
        phases: &[Phase::Luteal],
    },
    SymptomInfo {
        symptom: Symptom::Nausea,
        label: "Nausea",
        phases: &[Phase::Menstrual],
    },
    SymptomInfo {
        symptom: Symptom::Insomnia,
        label: "Insomnia",
        phases: &[Phase::Luteal],
    },
    SymptomInfo {
        symptom: Symptom::Anxiety,
        label: "Anxiety",
        phases: &[Phase::Luteal],
    },
];

pub fn symptom_info(symptom: Symptom) -> &'static SymptomInfo {
    // SYMPTOMS is declared in enum order
    &SYMPTOMS[symptom as usize]
}

/// Symptoms commonly reported during `phase`, in table order.
pub fn expected_symptoms(phase: Phase) -> Vec<Symptom> {
    SYMPTOMS
        .iter()
        .filter(|s| s.occurs_in(phase))
        .map(|s| s.symptom)
        .collect()
}

pub fn mood_label(mood: Mood) -> &'static str {
    match mood {
        Mood::Great => "Great",
        Mood::Good => "Good",
        Mood::Okay => "Okay",
        Mood::Bad => "Bad",
        Mood::Terrible => "Terrible",
    }
}

pub fn flow_label(flow: FlowIntensity) -> &'static str {
    match flow {
        FlowIntensity::Spotting => "Spotting",
        FlowIntensity::Light => "Light",
        FlowIntensity::Medium => "Medium",
        FlowIntensity::Heavy => "Heavy",
    }
}

pub struct TrainingProfile {
    pub can_train: bool,
    pub intensity: TrainingIntensity,
    pub recommendation: &'static str,
    pub activities: &'static [&'static str],
    pub avoid: &'static [&'static str],
    pub tips: &'static [&'static str],
}

pub struct PhaseInfo {
    pub name: &'static str,
    pub short_name: &'static str,
    pub days: &'static str,
    pub energy: EnergyLevel,
    pub description: &'static str,
    pub hormones: &'static str,
    pub self_care: &'static [&'static str],
    pub training: TrainingProfile,
}

const MENSTRUAL: PhaseInfo = PhaseInfo {
    name: "Menstrual",
    short_name: "Period",
    days: "1-5",
    energy: EnergyLevel::Low,
    description: "Your body is menstruating. Fatigue, cramps and mood changes are common.",
    hormones: "Estrogen and progesterone are at their lowest",
    self_care: &["Extra rest", "Iron-rich foods", "Warm compresses", "Hydration"],
    training: TrainingProfile {
        can_train: true,
        intensity: TrainingIntensity::Light,
        recommendation: "Gentle movement recommended",
        activities: &["Restorative yoga", "Easy walks", "Stretching", "Light swimming"],
        avoid: &["HIIT", "Heavy lifting", "Intense core work"],
        tips: &[
            "Listen to your body and rest when you need to",
            "Gentle movement can ease cramps",
            "Stay hydrated",
            "Skip yoga inversions on heavy flow days",
        ],
    },
};

const FOLLICULAR: PhaseInfo = PhaseInfo {
    name: "Follicular",
    short_name: "Follicular",
    days: "6-13",
    energy: EnergyLevel::High,
    description: "Estrogen starts rising. Energy and motivation build up day by day.",
    hormones: "Estrogen rises gradually ahead of ovulation",
    self_care: &["Socialising", "Creative projects", "Learning something new", "Time outdoors"],
    training: TrainingProfile {
        can_train: true,
        intensity: TrainingIntensity::Intense,
        recommendation: "Great time to train hard",
        activities: &["HIIT", "Strength training", "Hard cardio", "Group classes", "Team sports"],
        avoid: &[],
        tips: &[
            "Use the energy peak for intense sessions",
            "Good moment to try new exercises",
            "Recovery is faster in this phase",
            "Ideal for chasing personal records",
        ],
    },
};

const OVULATION: PhaseInfo = PhaseInfo {
    name: "Ovulation",
    short_name: "Ovulation",
    days: "14-16",
    energy: EnergyLevel::High,
    description:
        "Estrogen peaks and an egg is released. Energy and confidence are at their highest.",
    hormones: "Estrogen peak with LH and FSH surge",
    self_care: &["Social plans", "Important conversations", "Collaborative projects"],
    training: TrainingProfile {
        can_train: true,
        intensity: TrainingIntensity::Intense,
        recommendation: "Peak physical performance",
        activities: &["Competitions", "High-intensity training", "Power work", "Vigorous cardio"],
        avoid: &[],
        tips: &[
            "Your body is at its strongest",
            "Take extra care of your joints",
            "Good moment for social workouts",
            "Ride the natural motivation",
        ],
    },
};

const LUTEAL: PhaseInfo = PhaseInfo {
    name: "Luteal",
    short_name: "Premenstrual",
    days: "17-28",
    energy: EnergyLevel::Medium,
    description: "Progesterone rises. Premenstrual symptoms may appear towards the end.",
    hormones: "Progesterone high, then falling if there is no pregnancy",
    self_care: &["Journaling", "Relaxing baths", "Healthy comfort food", "Time alone"],
    training: TrainingProfile {
        can_train: true,
        intensity: TrainingIntensity::Moderate,
        recommendation: "Ease the intensity down gradually",
        activities: &["Moderate strength work", "Pilates", "Yoga", "Walks", "Swimming"],
        avoid: &["Very long sessions", "Aggressive calorie restriction"],
        tips: &[
            "Your body needs more calories in this phase",
            "Pick workouts that make you feel good",
            "Exercise can help with PMS symptoms",
            "Prioritise sleep and recovery",
        ],
    },
};

pub fn phase_info(phase: Phase) -> &'static PhaseInfo {
    match phase {
        Phase::Menstrual => &MENSTRUAL,
        Phase::Follicular => &FOLLICULAR,
        Phase::Ovulation => &OVULATION,
        Phase::Luteal => &LUTEAL,
    }
}

pub fn recommendations(phase: Phase) -> [&'static str; 2] {
    match phase {
        Phase::Menstrual => ["Prioritise rest and hydration", "Eat iron-rich foods"],
        Phase::Follicular => ["Great moment for new challenges", "Your energy is rising"],
        Phase::Ovulation => ["Make the most of your energy peak", "Take extra care of your joints"],
        Phase::Luteal => ["Lower the intensity gradually", "Self-care is key in this phase"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symptom_table_matches_enum_order() {
        for (i, info) in SYMPTOMS.iter().enumerate() {
            assert_eq!(info.symptom as usize, i);
        }
        assert_eq!(symptom_info(Symptom::Anxiety).label, "Anxiety");
    }

    #[test]
    fn follicular_has_no_expected_symptoms() {
        assert!(expected_symptoms(Phase::Follicular).is_empty());
        assert_eq!(expected_symptoms(Phase::Ovulation), vec![Symptom::BreastTenderness]);
    }

    #[test]
    fn luteal_training_is_moderate() {
        let info = phase_info(Phase::Luteal);
        assert_eq!(info.training.intensity, TrainingIntensity::Moderate);
        assert_eq!(info.energy, EnergyLevel::Medium);
    }
}

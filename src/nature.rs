//! Controlled vocabulary of incident natures and the ordered matcher.
//!
//! The vocabulary is an ordered list: the first phrase found in the text wins.
//! More specific phrases must come before the generic phrases they contain
//! (`"Fire Alarm"` and `"Alarm Holdup/Panic"` before `"Alarm"`).

/// Nature phrases used by the Norman PD daily incident summaries, in match
/// priority order.
pub const NORMAN_NATURES: &[&str] = &[
    "911 Call Nature Unknown",
    "Welfare Check",
    "Warrant Service",
    "Vandalism",
    "VPO Violation",
    "Unknown Problem/Man Down",
    "Unconscious/Fainting",
    "Trespassing",
    "Traumatic Injury",
    "Transfer/Interfacility",
    "Traffic Stop",
    "Tobacco Violation",
    "Test Call",
    "Suspicious",
    "Supplement Report",
    "Stroke",
    "Stolen Vehicle",
    "Stand By EMS",
    "Stake Out",
    "Special Assignment",
    "Sick Person",
    "Shots Heard",
    "Shooting Stabbing Penetrating",
    "Shooting",
    "Runaway or Lost Child",
    "Robbery",
    "Road Rage",
    "Reckless Driving",
    "Public Intoxication",
    "Public Assist",
    "Prowler",
    "Preg/Child Birth/Miscarriage",
    "Pick Up Partner",
    "Pick Up Items",
    "Parking Problem",
    "Overdose/Poisoning",
    "Open Door/Premises Check",
    "Officer in Danger",
    "Officer Needed Nature Unk",
    "Noise Complaint",
    "Nature",
    "Fire Mutual Aid",
    "EMS Mutual Aid",
    "Mutual Aid",
    "Motorist Assist",
    "Molesting",
    "Missing Person",
    "Medical Call Pd Requested",
    "MVA With Injuries",
    "MVA Non Injury",
    "Loud Party",
    "Larceny",
    "Kidnapping",
    "Item Assignment",
    "Indecent Exposure",
    "Homicide",
    "Hit and Run",
    "Hemorrhage/Lacerations",
    "Heat/Cold Exposure",
    "Heart Problems/AICD",
    "Headache",
    "Harassment / Threats Report",
    "Fraud",
    "Found Item",
    "Forgery",
    "Foot Patrol",
    "Follow Up",
    "Fireworks",
    "Fire Water Rescue",
    "Fire Vehicle",
    "Fire Transformer Blown",
    "Fire Smoke Investigation",
    "Fire Residential",
    "Fire Odor Investigation",
    "Fire Grass",
    "Fire Gas Leak",
    "Fire Fuel Spill",
    "Fire Electrical Check",
    "Fire Dumpster",
    "Fire Down Power Line",
    "Fire Controlled Burn",
    "Fire Commercial",
    "Fire Carbon Monoxide Alarm",
    "Fire Alarm",
    "Fight",
    "Falls",
    "Eye Problems/Injuries",
    "Extra Patrol",
    "Escort/Transport",
    "Drunk Driver",
    "Drug Violation",
    "Drowning/Diving/Scuba Accident",
    "Disturbance/Domestic",
    "Diabetic Problems",
    "Debris in Roadway",
    "Convulsion/Seizure",
    "Contact a Subject",
    "Civil Standby",
    "Choking",
    "Chest Pain",
    "Check Area",
    "Cardiac Respritory Arrest",
    "Carbon Mon/Inhalation/HazMat",
    "HazMat",
    "COP Relationships",
    "COP Problem Solving",
    "COP DDACTS",
    "Burns/Explosions",
    "Burglary",
    "Breathing Problems",
    "Bomb/Threats/Package",
    "Body Reported",
    "Bike Patrol",
    "Barking Dog",
    "Bar Check",
    "Back Pain",
    "Assist Police",
    "Assist Fire",
    "Assist EMS",
    "Assault EMS Needed",
    "Assault",
    "Animal at Large",
    "Animal Vicious",
    "Animal Trapped",
    "Animal Livestock",
    "Animal Injured",
    "Animal Dead",
    "Animal Complaint",
    "Animal Bites/Attacks",
    "Animal Bite",
    "Allergies/Envenomations",
    "Alcohol Violation",
    "Alarm Holdup/Panic",
    "Alarm",
    "Abdominal Pains/Problems",
];

/// An ordered list of nature phrases. Order is match priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    phrases: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(NORMAN_NATURES.iter().map(|s| s.to_string()).collect())
    }
}

impl Vocabulary {
    pub fn new(phrases: Vec<String>) -> Self {
        Self { phrases }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Find the first phrase (in vocabulary order) contained in `text`.
    ///
    /// Returns the phrase and `text` with one occurrence of it removed. When
    /// nothing matches the nature is empty and the text comes back unchanged.
    pub fn match_nature(&self, text: &str) -> (String, String) {
        match self.phrases.iter().find(|p| text.contains(p.as_str())) {
            Some(phrase) => (phrase.clone(), text.replacen(phrase.as_str(), "", 1)),
            None => (String::new(), text.to_string()),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earlier_phrase_wins() {
        let vocab: Vocabulary = ["Fire Alarm", "Welfare Check", "Alarm"].into_iter().collect();
        let (nature, rest) = vocab.match_nature(" 100 Main St Fire Alarm ");
        assert_eq!(nature, "Fire Alarm");
        assert_eq!(rest, " 100 Main St  ");
    }

    #[test]
    fn generic_phrase_listed_first_shadows_specific_one() {
        let vocab: Vocabulary = ["Alarm", "Fire Alarm"].into_iter().collect();
        let (nature, rest) = vocab.match_nature("Main St Fire Alarm");
        assert_eq!(nature, "Alarm");
        assert_eq!(rest, "Main St Fire ");
    }

    #[test]
    fn no_match_leaves_text_unchanged() {
        let vocab: Vocabulary = ["Welfare Check"].into_iter().collect();
        let (nature, rest) = vocab.match_nature("Main St Something Else");
        assert_eq!(nature, "");
        assert_eq!(rest, "Main St Something Else");
    }

    #[test]
    fn only_one_occurrence_is_removed() {
        let vocab: Vocabulary = ["Fight"].into_iter().collect();
        let (_, rest) = vocab.match_nature("Fight Club Ave Fight");
        assert_eq!(rest, " Club Ave Fight");
    }

    #[test]
    fn default_vocabulary_orders_specific_alarms_first() {
        let vocab = Vocabulary::default();
        let pos = |p: &str| vocab.phrases().iter().position(|x| x == p).unwrap();
        assert!(pos("Fire Alarm") < pos("Alarm"));
        assert!(pos("Alarm Holdup/Panic") < pos("Alarm"));
        assert!(pos("Fire Carbon Monoxide Alarm") < pos("Fire Alarm"));
        assert!(pos("Assault EMS Needed") < pos("Assault"));

        let (nature, _) = vocab.match_nature("500 E Main St Alarm Holdup/Panic");
        assert_eq!(nature, "Alarm Holdup/Panic");
    }
}

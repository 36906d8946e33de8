use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use validator::Validate;

/// Graduate streams (points pool, scored on education and study location)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraduateStream {
    #[serde(rename = "Masters Graduate")]
    Masters,
    #[serde(rename = "PhD Graduate")]
    Phd,
}

/// Employer job offer streams (points pool, scored on the offer itself)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobOfferStream {
    #[serde(rename = "Foreign Worker")]
    ForeignWorker,
    #[serde(rename = "International Student")]
    InternationalStudent,
    #[serde(rename = "In-Demand Skills")]
    InDemandSkills,
}

/// Streams selected from the federal Express Entry pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpressEntryStream {
    #[serde(rename = "Human Capital Priorities")]
    HumanCapitalPriorities,
    #[serde(rename = "Skilled Trades")]
    SkilledTrades,
    #[serde(rename = "French-Speaking Skilled Worker")]
    FrenchSpeakingSkilledWorker,
}

/// Nomination stream, grouped by how it is scored.
///
/// Serialized as the stream's display label, e.g. `"Foreign Worker"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stream {
    Graduate(GraduateStream),
    JobOffer(JobOfferStream),
    ExpressEntry(ExpressEntryStream),
}

/// Coarse stream grouping, without the individual stream identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StreamCategory {
    Graduate,
    JobOffer,
    ExpressEntry,
}

impl Stream {
    pub const ALL: [Stream; 8] = [
        Stream::JobOffer(JobOfferStream::ForeignWorker),
        Stream::JobOffer(JobOfferStream::InternationalStudent),
        Stream::JobOffer(JobOfferStream::InDemandSkills),
        Stream::Graduate(GraduateStream::Masters),
        Stream::Graduate(GraduateStream::Phd),
        Stream::ExpressEntry(ExpressEntryStream::HumanCapitalPriorities),
        Stream::ExpressEntry(ExpressEntryStream::SkilledTrades),
        Stream::ExpressEntry(ExpressEntryStream::FrenchSpeakingSkilledWorker),
    ];

    pub fn category(&self) -> StreamCategory {
        match self {
            Stream::Graduate(_) => StreamCategory::Graduate,
            Stream::JobOffer(_) => StreamCategory::JobOffer,
            Stream::ExpressEntry(_) => StreamCategory::ExpressEntry,
        }
    }

    /// Streams ranked by this system's own points grid (EOI pool)
    pub fn is_points_pool(&self) -> bool {
        !matches!(self, Stream::ExpressEntry(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stream::Graduate(GraduateStream::Masters) => "Masters Graduate",
            Stream::Graduate(GraduateStream::Phd) => "PhD Graduate",
            Stream::JobOffer(JobOfferStream::ForeignWorker) => "Foreign Worker",
            Stream::JobOffer(JobOfferStream::InternationalStudent) => "International Student",
            Stream::JobOffer(JobOfferStream::InDemandSkills) => "In-Demand Skills",
            Stream::ExpressEntry(ExpressEntryStream::HumanCapitalPriorities) => {
                "Human Capital Priorities"
            }
            Stream::ExpressEntry(ExpressEntryStream::SkilledTrades) => "Skilled Trades",
            Stream::ExpressEntry(ExpressEntryStream::FrenchSpeakingSkilledWorker) => {
                "French-Speaking Skilled Worker"
            }
        }
    }
}

impl Default for Stream {
    fn default() -> Self {
        Stream::JobOffer(JobOfferStream::ForeignWorker)
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaritalStatus {
    #[default]
    Single,
    Married,
}

/// Self-reported candidate profile
///
/// Everything except the stream may be missing. A missing field scores as the
/// lowest tier; it is never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub stream: Stream,

    // Job offer
    #[serde(default)]
    pub noc_teer: Option<String>,
    #[serde(default)]
    pub noc_broad_category: Option<String>,
    /// Hourly wage in dollars
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub wage_amount: Option<f64>,
    #[serde(default)]
    pub currently_working_with_employer: Option<bool>,

    // Education
    #[serde(default)]
    pub education_level: Option<String>,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub canadian_credential_count: Option<String>,

    #[serde(default)]
    pub has_valid_permit: Option<bool>,
    #[serde(default)]
    pub earnings_history: Option<bool>,

    // Language
    #[serde(default)]
    #[validate(range(max = 12))]
    pub clb_level: Option<u8>,
    #[serde(default)]
    pub bilingual: Option<bool>,

    // Regionalization
    #[serde(default)]
    pub work_location: Option<String>,
    #[serde(default)]
    pub study_location: Option<String>,

    // Express Entry
    #[serde(default)]
    pub crs_score: Option<u32>,
    #[serde(default)]
    pub has_trade_experience: Option<bool>,
    #[serde(default)]
    pub is_french_speaker: Option<bool>,
    #[serde(default)]
    pub is_tech_occupation: Option<bool>,

    // CRS estimation
    #[serde(default)]
    #[validate(range(max = 120))]
    pub age: Option<u8>,
    #[serde(default)]
    pub marital_status: Option<MaritalStatus>,
    #[serde(default)]
    pub spouse_is_canadian: Option<bool>,
    #[serde(default)]
    pub spouse_education_level: Option<String>,
    #[serde(default)]
    #[validate(range(max = 12))]
    pub spouse_clb_level: Option<u8>,
    #[serde(default)]
    #[validate(range(max = 50))]
    pub spouse_canadian_work_experience_years: Option<u8>,
    #[serde(default)]
    #[validate(range(max = 50))]
    pub canadian_work_experience_years: Option<u8>,
    #[serde(default)]
    #[validate(range(max = 50))]
    pub foreign_work_experience_years: Option<u8>,
    #[serde(default)]
    pub certificate_of_qualification: Option<bool>,
    #[serde(default)]
    pub sibling_in_canada: Option<bool>,
}

impl Profile {
    /// Empty profile for a stream
    pub fn new(stream: Stream) -> Self {
        Self {
            stream,
            ..Default::default()
        }
    }

    pub fn valid_permit(&self) -> bool {
        self.has_valid_permit.unwrap_or(false)
    }

    pub fn earnings(&self) -> bool {
        self.earnings_history.unwrap_or(false)
    }

    pub fn six_month_tenure(&self) -> bool {
        self.currently_working_with_employer.unwrap_or(false)
    }

    pub fn is_bilingual(&self) -> bool {
        self.bilingual.unwrap_or(false)
    }

    /// First official language band, 0 when not provided
    pub fn language_band(&self) -> u8 {
        self.clb_level.unwrap_or(0)
    }

    /// Hourly wage, 0 when not provided
    pub fn wage(&self) -> f64 {
        self.wage_amount.unwrap_or(0.0)
    }
}

/// Ordered per-factor point breakdown
///
/// Keeps insertion order, which is the order factors were evaluated in.
/// Serializes as a JSON object in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breakdown(Vec<(String, u32)>);

impl Breakdown {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Record points for a factor, replacing an earlier entry with the same label
    pub fn insert(&mut self, label: impl Into<String>, points: u32) {
        let label = label.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == label) {
            Some(entry) => entry.1 = points,
            None => self.0.push((label, points)),
        }
    }

    pub fn get(&self, label: &str) -> Option<u32> {
        self.0
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, points)| *points)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(label, points)| (label.as_str(), *points))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(label, _)| label.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sum(&self) -> u32 {
        self.0.iter().map(|(_, points)| points).sum()
    }
}

impl Serialize for Breakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, points) in &self.0 {
            map.serialize_entry(label, points)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Breakdown {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BreakdownVisitor;

        impl<'de> Visitor<'de> for BreakdownVisitor {
            type Value = Breakdown;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of factor labels to points")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Breakdown, A::Error> {
                let mut breakdown = Breakdown::new();
                while let Some((label, points)) = access.next_entry::<String, u32>()? {
                    breakdown.insert(label, points);
                }
                Ok(breakdown)
            }
        }

        deserializer.deserialize_map(BreakdownVisitor)
    }
}

/// Points estimate for a profile under its stream's grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub total: u32,
    pub breakdown: Breakdown,
    pub eligible: bool,
    pub max_possible: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Impact {
    High,
    Medium,
    Low,
}

/// A concrete action that would raise the estimated score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub title: String,
    pub description: String,
    pub impact: Impact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
}

/// Qualitative draw outlook for Express Entry streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressEntryStatus {
    CrsMissing,
    TechHigh,
    TechModerate,
    TechLow,
    GeneralHigh,
    GeneralModerate,
    GeneralLow,
    FrenchHigh,
    FrenchLow,
    TradesHigh,
    TradesCheck,
    NotExpressEntry,
}

impl ExpressEntryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ExpressEntryStatus::CrsMissing => "Calculate CRS Score first",
            ExpressEntryStatus::TechHigh => "High Probability (Tech Draws typically > 460)",
            ExpressEntryStatus::TechModerate => "Moderate Probability (Tech Draws fluctuate)",
            ExpressEntryStatus::TechLow => "Low Probability for Tech (Try improving to 460+)",
            ExpressEntryStatus::GeneralHigh => "High Probability (Recent General Draws > 470)",
            ExpressEntryStatus::GeneralModerate => "Moderate Probability",
            ExpressEntryStatus::GeneralLow => "Low Probability (General draws are competitive)",
            ExpressEntryStatus::FrenchHigh => "High Probability (French draws typical > 300-350)",
            ExpressEntryStatus::FrenchLow => "Low Probability (Requires French CLB 7+)",
            ExpressEntryStatus::TradesHigh => "High Probability",
            ExpressEntryStatus::TradesCheck => "Check Trade Requirements",
            ExpressEntryStatus::NotExpressEntry => "Check specific program guides",
        }
    }
}

impl fmt::Display for ExpressEntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ExpressEntryStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

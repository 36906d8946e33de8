use crate::core::tables::{
    codes, RuleTable, CANADIAN_CREDENTIALS, CLB_LEVELS, EDUCATION_LEVELS, FIELDS_OF_STUDY,
    NOC_BROAD_CATEGORIES, REGIONS, TEER_LEVELS, WAGE_BANDS,
};
use crate::models::{
    Breakdown, ExpressEntryStatus, ExpressEntryStream, GraduateStream, JobOfferStream, Profile,
    ScoreResult, Stream,
};

pub const PERMIT_POINTS: u32 = 10;
pub const EARNINGS_POINTS: u32 = 3;
pub const TENURE_POINTS: u32 = 3;
pub const BILINGUAL_POINTS: u32 = 10;

/// Minimum first-language band for the Masters Graduate stream
const MASTERS_MIN_LANGUAGE_BAND: u8 = 7;

/// Accumulates awarded points alongside the attainable maximum
struct Tally {
    breakdown: Breakdown,
    total: u32,
    max_possible: u32,
}

impl Tally {
    fn new() -> Self {
        Self {
            breakdown: Breakdown::new(),
            total: 0,
            max_possible: 0,
        }
    }

    /// Always recorded, even when nothing is awarded
    fn factor(&mut self, label: &str, points: u32, max: u32) {
        self.breakdown.insert(label, points);
        self.total += points;
        self.max_possible += max;
    }

    /// Fixed bonus, only listed in the breakdown when earned
    fn bonus(&mut self, label: &str, earned: bool, points: u32) {
        if earned {
            self.breakdown.insert(label, points);
            self.total += points;
        }
        self.max_possible += points;
    }

    fn lookup(&mut self, label: &str, table: &RuleTable<&'static str>, value: Option<&str>) {
        self.factor(label, table.lookup(value), table.max_points());
    }

    fn finish(self, eligible: bool) -> ScoreResult {
        ScoreResult {
            total: self.total,
            breakdown: self.breakdown,
            eligible,
            max_possible: self.max_possible,
        }
    }
}

/// Estimate the provincial points score for a profile under its stream's grid
///
/// Express Entry streams are not scored here; they get an empty result and are
/// judged by [`express_entry_status`] on the federal CRS score instead.
pub fn compute_score(profile: &Profile) -> ScoreResult {
    let result = match profile.stream {
        Stream::Graduate(stream) => score_graduate(stream, profile),
        Stream::JobOffer(stream) => score_job_offer(stream, profile),
        Stream::ExpressEntry(_) => ScoreResult {
            eligible: true,
            ..ScoreResult::default()
        },
    };

    tracing::trace!(
        "Scored {} profile: {}/{} (eligible: {})",
        profile.stream,
        result.total,
        result.max_possible,
        result.eligible
    );

    result
}

fn score_graduate(stream: GraduateStream, profile: &Profile) -> ScoreResult {
    let mut tally = Tally::new();

    // Labour market
    tally.bonus("Valid Work/Study Permit", profile.valid_permit(), PERMIT_POINTS);
    tally.bonus("Earnings History ($40k+)", profile.earnings(), EARNINGS_POINTS);

    // Education
    tally.lookup(
        "Highest Level of Education",
        &EDUCATION_LEVELS,
        profile.education_level.as_deref(),
    );
    tally.lookup(
        "Field of Study",
        &FIELDS_OF_STUDY,
        profile.field_of_study.as_deref(),
    );
    tally.lookup(
        "Canadian Education Experience",
        &CANADIAN_CREDENTIALS,
        profile.canadian_credential_count.as_deref(),
    );

    // Language
    tally.factor(
        "Official Language Ability",
        CLB_LEVELS.lookup_band(profile.language_band()),
        CLB_LEVELS.max_points(),
    );
    tally.factor(
        "Knowledge of Official Languages",
        if profile.is_bilingual() { BILINGUAL_POINTS } else { 0 },
        BILINGUAL_POINTS,
    );

    // Regionalization
    tally.lookup(
        "Location of Study",
        &REGIONS,
        profile.study_location.as_deref(),
    );

    let education = profile.education_level.as_deref();
    let eligible = match stream {
        GraduateStream::Masters => {
            education == Some(codes::MASTERS)
                && profile.language_band() >= MASTERS_MIN_LANGUAGE_BAND
        }
        GraduateStream::Phd => education == Some(codes::PHD),
    };

    tally.finish(eligible)
}

fn score_job_offer(stream: JobOfferStream, profile: &Profile) -> ScoreResult {
    let mut tally = Tally::new();

    // International students get no TEER points; shown as an explicit zero
    // and left out of the attainable maximum.
    match stream {
        JobOfferStream::InternationalStudent => {
            tally.breakdown.insert("Job Level (TEER) (Excluded for Students)", 0);
        }
        JobOfferStream::ForeignWorker | JobOfferStream::InDemandSkills => {
            tally.lookup("Job Level (TEER)", &TEER_LEVELS, profile.noc_teer.as_deref());
        }
    }

    tally.lookup(
        "Occupational Category",
        &NOC_BROAD_CATEGORIES,
        profile.noc_broad_category.as_deref(),
    );
    tally.factor(
        "Wage Level",
        WAGE_BANDS.lookup_band(profile.wage()),
        WAGE_BANDS.max_points(),
    );

    tally.bonus("Valid Work Permit", profile.valid_permit(), PERMIT_POINTS);
    tally.bonus("6 Months Tenure", profile.six_month_tenure(), TENURE_POINTS);
    tally.bonus("Earnings History ($40k+)", profile.earnings(), EARNINGS_POINTS);

    tally.lookup(
        "Regional Location",
        &REGIONS,
        profile.work_location.as_deref(),
    );

    let eligible = match stream {
        JobOfferStream::ForeignWorker => profile
            .noc_teer
            .as_deref()
            .is_some_and(|teer| !teer.is_empty()),
        JobOfferStream::InternationalStudent | JobOfferStream::InDemandSkills => true,
    };

    tally.finish(eligible)
}

/// Qualitative chance of an invitation for Express Entry streams
///
/// Compares the stored CRS score against recent draw levels for the stream.
pub fn express_entry_status(profile: &Profile) -> ExpressEntryStatus {
    // A zero score means none was entered
    let Some(score) = profile.crs_score.filter(|&score| score > 0) else {
        return ExpressEntryStatus::CrsMissing;
    };

    let stream = match profile.stream {
        Stream::ExpressEntry(stream) => stream,
        Stream::Graduate(_) | Stream::JobOffer(_) => return ExpressEntryStatus::NotExpressEntry,
    };

    match stream {
        ExpressEntryStream::HumanCapitalPriorities => {
            if profile.is_tech_occupation.unwrap_or(false) {
                match score {
                    s if s > 465 => ExpressEntryStatus::TechHigh,
                    s if s > 450 => ExpressEntryStatus::TechModerate,
                    _ => ExpressEntryStatus::TechLow,
                }
            } else {
                match score {
                    s if s > 470 => ExpressEntryStatus::GeneralHigh,
                    s if s > 460 => ExpressEntryStatus::GeneralModerate,
                    _ => ExpressEntryStatus::GeneralLow,
                }
            }
        }
        ExpressEntryStream::FrenchSpeakingSkilledWorker => {
            if profile.is_french_speaker.unwrap_or(false) && score > 350 {
                ExpressEntryStatus::FrenchHigh
            } else {
                ExpressEntryStatus::FrenchLow
            }
        }
        ExpressEntryStream::SkilledTrades => {
            if profile.has_trade_experience.unwrap_or(false) && score > 350 {
                ExpressEntryStatus::TradesHigh
            } else {
                ExpressEntryStatus::TradesCheck
            }
        }
    }
}

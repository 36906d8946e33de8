use crate::core::tables::{codes, crs};
use crate::models::{MaritalStatus, Profile};
use serde::Serialize;

/// Age assumed when none is given
pub const DEFAULT_AGE: u8 = 25;

pub const SKILL_TRANSFER_CAP: u32 = 100;
const TRANSFER_PAIR_CAP: u32 = 50;

pub const SIBLING_POINTS: u32 = 15;
pub const BILINGUAL_POINTS: u32 = 30;
pub const CANADIAN_DEGREE_POINTS: u32 = 30;
pub const CANADIAN_DIPLOMA_POINTS: u32 = 15;

/// Abilities (reading, writing, listening, speaking), all scored at the same band
const LANGUAGE_ABILITIES: u32 = 4;

/// Inputs the CRS estimate depends on
///
/// Two profiles with equal inputs always produce the same estimate, so this is
/// what a caller compares to decide whether to re-estimate after an edit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrsInputs {
    pub age: Option<u8>,
    pub education_level: Option<String>,
    pub marital_status: Option<MaritalStatus>,
    pub spouse_is_canadian: Option<bool>,
    pub clb_level: Option<u8>,
    pub canadian_work_experience_years: Option<u8>,
    pub foreign_work_experience_years: Option<u8>,
    pub bilingual: Option<bool>,
    pub certificate_of_qualification: Option<bool>,
    pub sibling_in_canada: Option<bool>,
    pub canadian_credential_count: Option<String>,
    pub spouse_education_level: Option<String>,
    pub spouse_clb_level: Option<u8>,
    pub spouse_canadian_work_experience_years: Option<u8>,
}

impl From<&Profile> for CrsInputs {
    fn from(profile: &Profile) -> Self {
        Self {
            age: profile.age,
            education_level: profile.education_level.clone(),
            marital_status: profile.marital_status,
            spouse_is_canadian: profile.spouse_is_canadian,
            clb_level: profile.clb_level,
            canadian_work_experience_years: profile.canadian_work_experience_years,
            foreign_work_experience_years: profile.foreign_work_experience_years,
            bilingual: profile.bilingual,
            certificate_of_qualification: profile.certificate_of_qualification,
            sibling_in_canada: profile.sibling_in_canada,
            canadian_credential_count: profile.canadian_credential_count.clone(),
            spouse_education_level: profile.spouse_education_level.clone(),
            spouse_clb_level: profile.spouse_clb_level,
            spouse_canadian_work_experience_years: profile.spouse_canadian_work_experience_years,
        }
    }
}

/// Per-section CRS points
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrsBreakdown {
    pub age: u32,
    pub education: u32,
    pub first_language: u32,
    pub canadian_experience: u32,
    pub spouse: u32,
    pub skill_transferability: u32,
    pub additional: u32,
}

impl CrsBreakdown {
    pub fn total(&self) -> u32 {
        self.age
            + self.education
            + self.first_language
            + self.canadian_experience
            + self.spouse
            + self.skill_transferability
            + self.additional
    }
}

/// Estimate the federal Comprehensive Ranking System score
///
/// A simplified estimate: every language ability is assumed to be at the
/// first-language band, and a second official language earns a flat bonus.
pub fn estimate_crs(profile: &Profile) -> u32 {
    crs_breakdown(profile).total()
}

/// Estimate broken down by CRS section
pub fn crs_breakdown(profile: &Profile) -> CrsBreakdown {
    // An accompanying spouse who is a citizen or PR does not count
    let single = profile.marital_status.unwrap_or_default() != MaritalStatus::Married
        || profile.spouse_is_canadian.unwrap_or(false);

    // An age of 0 is an unfilled field, not a newborn
    let age = profile.age.filter(|&age| age > 0).unwrap_or(DEFAULT_AGE);
    let education = profile
        .education_level
        .as_deref()
        .unwrap_or(codes::NO_EDUCATION);
    let clb = profile.language_band();
    let canadian_years = profile.canadian_work_experience_years.unwrap_or(0);
    let foreign_years = profile.foreign_work_experience_years.unwrap_or(0);

    let (education_table, language_table, experience_table) = if single {
        (
            &crs::EDUCATION_SINGLE,
            &crs::LANGUAGE_SINGLE,
            &crs::CANADIAN_EXPERIENCE_SINGLE,
        )
    } else {
        (
            &crs::EDUCATION_MARRIED,
            &crs::LANGUAGE_MARRIED,
            &crs::CANADIAN_EXPERIENCE_MARRIED,
        )
    };

    CrsBreakdown {
        age: age_points(age, single),
        education: education_table.lookup(Some(education)),
        first_language: language_table.lookup_band(clb) * LANGUAGE_ABILITIES,
        canadian_experience: experience_table.lookup_band(canadian_years),
        spouse: if single { 0 } else { spouse_points(profile) },
        skill_transferability: skill_transferability(
            education,
            clb,
            canadian_years,
            foreign_years,
            profile.certificate_of_qualification.unwrap_or(false),
        ),
        additional: additional_points(profile, education),
    }
}

/// Full points from 20 to 29, tapering off to nothing at 45
fn age_points(age: u8, single: bool) -> u32 {
    let (peak, at_19, at_18, yearly_drop) = if single {
        (110.0, 105, 99, 5.5)
    } else {
        (100.0, 95, 90, 5.0)
    };

    match age {
        20..=29 => peak as u32,
        19 => at_19,
        18 => at_18,
        0..=17 | 45.. => 0,
        _ => {
            let points: f64 = peak - f64::from(age - 29) * yearly_drop;
            points.max(0.0).floor() as u32
        }
    }
}

fn spouse_points(profile: &Profile) -> u32 {
    let education = crs::SPOUSE_EDUCATION.lookup(
        Some(
            profile
                .spouse_education_level
                .as_deref()
                .unwrap_or(codes::NO_EDUCATION),
        ),
    );
    let language =
        crs::SPOUSE_LANGUAGE.lookup_band(profile.spouse_clb_level.unwrap_or(0)) * LANGUAGE_ABILITIES;
    let experience = crs::SPOUSE_CANADIAN_EXPERIENCE
        .lookup_band(profile.spouse_canadian_work_experience_years.unwrap_or(0));

    education + language + experience
}

/// Post-secondary tier used by the education transferability factors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EducationTier {
    /// Two or more years of post-secondary
    High,
    /// One year of post-secondary
    Medium,
    None,
}

impl EducationTier {
    fn of(education: &str) -> Self {
        if crs::HIGH_EDUCATION.contains(&education) {
            EducationTier::High
        } else if crs::MEDIUM_EDUCATION.contains(&education) {
            EducationTier::Medium
        } else {
            EducationTier::None
        }
    }
}

/// Shared shape of every transferability combination: a strong/weak primary
/// factor against a strong/weak secondary factor.
fn combination(primary_strong: bool, primary_weak: bool, secondary: Strength) -> u32 {
    match (secondary, primary_strong, primary_weak) {
        (Strength::Strong, true, _) => 50,
        (Strength::Strong, false, true) => 25,
        (Strength::Weak, true, _) => 25,
        (Strength::Weak, false, true) => 13,
        _ => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strength {
    Strong,
    Weak,
    None,
}

impl Strength {
    fn language(clb: u8) -> Self {
        match clb {
            9.. => Strength::Strong,
            7..=8 => Strength::Weak,
            _ => Strength::None,
        }
    }

    fn canadian_experience(years: u8) -> Self {
        match years {
            2.. => Strength::Strong,
            1 => Strength::Weak,
            _ => Strength::None,
        }
    }
}

fn skill_transferability(
    education: &str,
    clb: u8,
    canadian_years: u8,
    foreign_years: u8,
    trade_certificate: bool,
) -> u32 {
    let tier = EducationTier::of(education);
    let high_edu = tier == EducationTier::High;
    let medium_edu = tier == EducationTier::Medium;

    let education_transfer = (combination(high_edu, medium_edu, Strength::language(clb))
        + combination(
            high_edu,
            medium_edu,
            Strength::canadian_experience(canadian_years),
        ))
    .min(TRANSFER_PAIR_CAP);

    let long_foreign = foreign_years >= 3;
    let short_foreign = foreign_years >= 1;
    let foreign_transfer = (combination(long_foreign, short_foreign, Strength::language(clb))
        + combination(
            long_foreign,
            short_foreign,
            Strength::canadian_experience(canadian_years),
        ))
    .min(TRANSFER_PAIR_CAP);

    let trade = if trade_certificate {
        crs::TRADE_CERTIFICATE.lookup_band(clb)
    } else {
        0
    };

    (education_transfer + foreign_transfer + trade).min(SKILL_TRANSFER_CAP)
}

fn additional_points(profile: &Profile, education: &str) -> u32 {
    let mut points = 0;

    if profile.sibling_in_canada.unwrap_or(false) {
        points += SIBLING_POINTS;
    }

    // Flat bonus regardless of the second language band
    if profile.is_bilingual() {
        points += BILINGUAL_POINTS;
    }

    let has_canadian_credential = profile
        .canadian_credential_count
        .as_deref()
        .is_some_and(|count| !count.is_empty() && count != codes::NO_CREDENTIALS);
    if has_canadian_credential {
        points += if crs::DEGREE_OR_ABOVE.contains(&education) {
            CANADIAN_DEGREE_POINTS
        } else {
            CANADIAN_DIPLOMA_POINTS
        };
    }

    points
}

/// New estimate to store, or `None` when it matches the stored score
///
/// Keeps a manually entered score from being rewritten when nothing that feeds
/// the estimate has changed it.
pub fn refresh_crs(profile: &Profile) -> Option<u32> {
    let estimate = estimate_crs(profile);
    if profile.crs_score == Some(estimate) {
        None
    } else {
        Some(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpressEntryStream, Stream};

    fn applicant() -> Profile {
        Profile::new(Stream::ExpressEntry(
            ExpressEntryStream::HumanCapitalPriorities,
        ))
    }

    #[test]
    fn test_age_curve_single() {
        assert_eq!(age_points(17, true), 0);
        assert_eq!(age_points(18, true), 99);
        assert_eq!(age_points(19, true), 105);
        assert_eq!(age_points(20, true), 110);
        assert_eq!(age_points(29, true), 110);
        assert_eq!(age_points(30, true), 104); // 104.5 floored
        assert_eq!(age_points(31, true), 99);
        assert_eq!(age_points(44, true), 27); // 27.5 floored
        assert_eq!(age_points(45, true), 0);
        assert_eq!(age_points(80, true), 0);
    }

    #[test]
    fn test_age_curve_married() {
        assert_eq!(age_points(18, false), 90);
        assert_eq!(age_points(19, false), 95);
        assert_eq!(age_points(25, false), 100);
        assert_eq!(age_points(30, false), 95);
        assert_eq!(age_points(44, false), 25);
        assert_eq!(age_points(45, false), 0);
    }

    #[test]
    fn test_defaults_for_empty_profile() {
        let breakdown = crs_breakdown(&applicant());

        assert_eq!(breakdown.age, 110);
        assert_eq!(breakdown.education, 0);
        assert_eq!(breakdown.first_language, 0);
        assert_eq!(breakdown.skill_transferability, 0);
        assert_eq!(breakdown.total(), 110);
    }

    #[test]
    fn test_blank_fields_fall_back() {
        let mut profile = applicant();
        profile.age = Some(0);
        profile.canadian_credential_count = Some(String::new());

        let breakdown = crs_breakdown(&profile);
        assert_eq!(breakdown.age, 110);
        assert_eq!(breakdown.additional, 0);
        assert_eq!(estimate_crs(&profile), estimate_crs(&applicant()));

        profile.canadian_credential_count = Some("0".to_string());
        assert_eq!(crs_breakdown(&profile).additional, 0);
        profile.canadian_credential_count = Some("1".to_string());
        assert_eq!(crs_breakdown(&profile).additional, CANADIAN_DIPLOMA_POINTS);
    }

    #[test]
    fn test_hand_traced_single_applicant() {
        let mut profile = applicant();
        profile.age = Some(27);
        profile.education_level = Some("phd".to_string());
        profile.clb_level = Some(9);
        profile.canadian_work_experience_years = Some(3);
        profile.canadian_credential_count = Some("1".to_string());

        let breakdown = crs_breakdown(&profile);

        assert_eq!(breakdown.age, 110);
        assert_eq!(breakdown.education, 150);
        assert_eq!(breakdown.first_language, 31 * 4);
        assert_eq!(breakdown.canadian_experience, 64);
        assert_eq!(breakdown.spouse, 0);
        assert_eq!(breakdown.skill_transferability, 50);
        assert_eq!(breakdown.additional, 30);
        assert_eq!(estimate_crs(&profile), 528);
    }

    #[test]
    fn test_canadian_spouse_scores_as_single() {
        let mut single = applicant();
        single.age = Some(33);
        single.education_level = Some("masters".to_string());
        single.clb_level = Some(8);
        single.canadian_work_experience_years = Some(1);

        let mut married = single.clone();
        married.marital_status = Some(MaritalStatus::Married);
        married.spouse_is_canadian = Some(true);
        married.spouse_education_level = Some("phd".to_string());
        married.spouse_clb_level = Some(10);
        married.spouse_canadian_work_experience_years = Some(5);

        assert_eq!(crs_breakdown(&married).spouse, 0);
        assert_eq!(estimate_crs(&married), estimate_crs(&single));
    }

    #[test]
    fn test_accompanying_spouse_factors() {
        let mut profile = applicant();
        profile.marital_status = Some(MaritalStatus::Married);
        profile.spouse_education_level = Some("masters".to_string());
        profile.spouse_clb_level = Some(9);
        profile.spouse_canadian_work_experience_years = Some(7);

        let breakdown = crs_breakdown(&profile);
        assert_eq!(breakdown.spouse, 10 + 20 + 10);
        assert_eq!(breakdown.age, 100);

        profile.spouse_clb_level = Some(6);
        profile.spouse_canadian_work_experience_years = Some(2);
        profile.spouse_education_level = Some("cert".to_string());
        assert_eq!(crs_breakdown(&profile).spouse, 2 + 4 + 7);
    }

    #[test]
    fn test_married_tables_apply() {
        let mut profile = applicant();
        profile.marital_status = Some(MaritalStatus::Married);
        profile.education_level = Some("diploma2".to_string());
        profile.clb_level = Some(10);
        profile.canadian_work_experience_years = Some(5);

        let breakdown = crs_breakdown(&profile);
        assert_eq!(breakdown.education, 91);
        assert_eq!(breakdown.first_language, 128);
        assert_eq!(breakdown.canadian_experience, 70);
    }

    #[test]
    fn test_transferability_pairs_capped() {
        // Education pair: 50 + 50 capped at 50
        assert_eq!(skill_transferability("degree", 9, 2, 0, false), 50);
        // Medium education, weak language and one year: 13 + 13
        assert_eq!(skill_transferability("diploma1", 7, 1, 0, false), 26);
        // Foreign experience pair only
        assert_eq!(skill_transferability("none", 9, 0, 3, false), 50);
        assert_eq!(skill_transferability("none", 7, 1, 1, false), 26);
        // Trade certificate alone
        assert_eq!(skill_transferability("none", 5, 0, 0, true), 25);
    }

    #[test]
    fn test_transferability_total_capped_at_100() {
        let everything = skill_transferability("phd", 10, 5, 5, true);
        assert_eq!(everything, SKILL_TRANSFER_CAP);
    }

    #[test]
    fn test_additional_points() {
        let mut profile = applicant();
        profile.sibling_in_canada = Some(true);
        profile.bilingual = Some(true);
        profile.canadian_credential_count = Some("0".to_string());
        assert_eq!(crs_breakdown(&profile).additional, 45);

        profile.canadian_credential_count = Some("2+".to_string());
        profile.education_level = Some("diploma2".to_string());
        assert_eq!(crs_breakdown(&profile).additional, 60);

        profile.education_level = Some("degree".to_string());
        assert_eq!(crs_breakdown(&profile).additional, 75);
    }

    #[test]
    fn test_refresh_only_when_changed() {
        let mut profile = applicant();
        profile.age = Some(27);

        let first = refresh_crs(&profile);
        assert_eq!(first, Some(110));

        profile.crs_score = first;
        assert_eq!(refresh_crs(&profile), None);
    }

    #[test]
    fn test_inputs_ignore_unrelated_fields() {
        let mut profile = applicant();
        let before = CrsInputs::from(&profile);

        profile.wage_amount = Some(45.0);
        profile.work_location = Some("northern".to_string());
        assert_eq!(CrsInputs::from(&profile), before);

        profile.sibling_in_canada = Some(true);
        assert_ne!(CrsInputs::from(&profile), before);
    }
}

use crate::core::calculator::{BILINGUAL_POINTS, EARNINGS_POINTS, PERMIT_POINTS, TENURE_POINTS};
use crate::core::tables::{
    codes, CANADIAN_CREDENTIALS, CLB_LEVELS, NOC_BROAD_CATEGORIES, REGIONS, WAGE_BANDS,
};
use crate::models::{Impact, Profile, Stream, Suggestion};

/// Band at which first-language points max out
const TOP_LANGUAGE_BAND: u8 = 9;
/// Wage below which the wage factor scores nothing
const LOWEST_SCORING_WAGE: f64 = 20.0;
/// Typical gain from one more Canadian credential
const EXTRA_CREDENTIAL_POINTS: u32 = 5;

fn suggestion(
    id: &str,
    title: &str,
    description: &str,
    impact: Impact,
    points: u32,
) -> Suggestion {
    Suggestion {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        impact,
        points: Some(points),
    }
}

/// Improvement actions for a profile, in a fixed group order
///
/// Each group only looks at factors its stream category is scored on. Factors
/// already at their best tier produce nothing, so an empty list means the
/// profile is as strong as the modeled factors allow.
pub fn generate_suggestions(profile: &Profile) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    suggest_region(profile, &mut suggestions);
    suggest_wage(profile, &mut suggestions);
    suggest_language(profile, &mut suggestions);
    suggest_job_offer_bonuses(profile, &mut suggestions);
    suggest_occupation(profile, &mut suggestions);
    suggest_credential(profile, &mut suggestions);

    tracing::trace!(
        "Generated {} suggestions for {} profile",
        suggestions.len(),
        profile.stream
    );

    suggestions
}

fn suggest_region(profile: &Profile, out: &mut Vec<Suggestion>) {
    let (location, graduate) = match profile.stream {
        Stream::Graduate(_) => (profile.study_location.as_deref(), true),
        Stream::JobOffer(_) => (profile.work_location.as_deref(), false),
        Stream::ExpressEntry(_) => return,
    };
    let Some(location) = location else {
        return;
    };

    let top = REGIONS.max_points();
    let gain = top.saturating_sub(REGIONS.lookup(Some(location)));

    match location {
        codes::TORONTO | codes::GTA if gain > 0 => {
            let (title, description) = if graduate {
                (
                    "Study in Northern Ontario",
                    "Studying at an institution in Northern Ontario grants the maximum 10 points for location (vs 0 for Toronto or 3 for GTA).",
                )
            } else {
                (
                    "Work in Northern Ontario",
                    "Securing a job offer in Northern Ontario (e.g., Sudbury, Thunder Bay) grants 10 points (vs 3 for GTA).",
                )
            };
            out.push(suggestion("region", title, description, Impact::High, gain));
        }
        codes::OUTSIDE_GTA if !graduate && gain > 0 => {
            out.push(suggestion(
                "region-north",
                "Move to Northern Ontario",
                "Northern Ontario offers 10 points compared to 8 points for other areas outside the GTA.",
                Impact::Low,
                gain,
            ));
        }
        _ => {}
    }
}

fn suggest_wage(profile: &Profile, out: &mut Vec<Suggestion>) {
    if !matches!(profile.stream, Stream::JobOffer(_)) {
        return;
    }

    let wage = profile.wage();
    let gain = WAGE_BANDS
        .max_points()
        .saturating_sub(WAGE_BANDS.lookup_band(wage));
    if gain == 0 {
        return;
    }

    let impact = if wage < LOWEST_SCORING_WAGE {
        Impact::High
    } else {
        Impact::Medium
    };
    out.push(suggestion(
        "wage",
        "Negotiate Higher Wage",
        "A wage of $40/hr or higher (approx $80k/yr) secures the maximum 10 points for this category.",
        impact,
        gain,
    ));
}

fn suggest_language(profile: &Profile, out: &mut Vec<Suggestion>) {
    if matches!(profile.stream, Stream::JobOffer(_)) {
        return;
    }

    let band = profile.language_band();
    if band < TOP_LANGUAGE_BAND {
        let gain = CLB_LEVELS
            .max_points()
            .saturating_sub(CLB_LEVELS.lookup_band(band));
        out.push(suggestion(
            "language",
            "Improve Official Language Score",
            "Achieving CLB 9 or higher in your first official language maximizes language points.",
            Impact::High,
            gain,
        ));
    }

    if !profile.is_bilingual() {
        out.push(suggestion(
            "bilingual",
            "Learn a Second Official Language",
            "Demonstrating proficiency in both English and French (CLB 7+) adds significant points.",
            Impact::High,
            BILINGUAL_POINTS,
        ));
    }
}

fn suggest_job_offer_bonuses(profile: &Profile, out: &mut Vec<Suggestion>) {
    if !matches!(profile.stream, Stream::JobOffer(_)) {
        return;
    }

    if !profile.six_month_tenure() {
        out.push(suggestion(
            "tenure",
            "Complete 6 Months Tenure",
            "Staying with your current employer for at least 6 months before applying adds 3 points.",
            Impact::Medium,
            TENURE_POINTS,
        ));
    }
    if !profile.valid_permit() {
        out.push(suggestion(
            "permit",
            "Secure Valid Status",
            "Having a valid work or study permit at the time of EOI registration adds 10 points.",
            Impact::High,
            PERMIT_POINTS,
        ));
    }
    if !profile.earnings() {
        out.push(suggestion(
            "earnings",
            "Build Earnings History",
            "Earning at least $40k in a single tax year in Canada (in the last 5 years) adds 3 points.",
            Impact::Medium,
            EARNINGS_POINTS,
        ));
    }
}

fn suggest_occupation(profile: &Profile, out: &mut Vec<Suggestion>) {
    if !matches!(profile.stream, Stream::JobOffer(_)) {
        return;
    }

    let top = NOC_BROAD_CATEGORIES.max_points();
    match profile.noc_broad_category.as_deref() {
        None | Some(codes::SERVICE_CATEGORY) => out.push(suggestion(
            "category",
            "Target Strategic Occupations",
            "Jobs in Health, Trades, STEM, Transport, or Manufacturing grant the highest points (10 pts).",
            Impact::High,
            top,
        )),
        Some(codes::BUSINESS_CATEGORY) => {
            let gain = top.saturating_sub(NOC_BROAD_CATEGORIES.lookup(Some(codes::BUSINESS_CATEGORY)));
            out.push(suggestion(
                "category-shift",
                "Shift to STEM/Trades/Health",
                "Business & Admin roles get 5 points, while STEM/Health/Trades get 10.",
                Impact::Medium,
                gain,
            ));
        }
        Some(_) => {}
    }
}

fn suggest_credential(profile: &Profile, out: &mut Vec<Suggestion>) {
    if !matches!(profile.stream, Stream::Graduate(_)) {
        return;
    }

    let at_top = CANADIAN_CREDENTIALS
        .top()
        .is_some_and(|top| profile.canadian_credential_count.as_deref() == Some(top.value));
    if !at_top {
        out.push(suggestion(
            "credential",
            "Additional Canadian Credential",
            "Completing another Canadian credential (e.g., a 1-year certificate) adds 5 points.",
            Impact::Medium,
            EXTRA_CREDENTIAL_POINTS,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpressEntryStream, GraduateStream, JobOfferStream};

    fn ids(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.id.as_str()).collect()
    }

    fn find<'a>(suggestions: &'a [Suggestion], id: &str) -> &'a Suggestion {
        suggestions
            .iter()
            .find(|s| s.id == id)
            .unwrap_or_else(|| panic!("missing suggestion {id}"))
    }

    #[test]
    fn test_empty_job_offer_profile() {
        let profile = Profile::new(Stream::JobOffer(JobOfferStream::ForeignWorker));
        let suggestions = generate_suggestions(&profile);

        assert_eq!(
            ids(&suggestions),
            vec!["wage", "tenure", "permit", "earnings", "category"]
        );
        let wage = find(&suggestions, "wage");
        assert_eq!(wage.impact, Impact::High);
        assert_eq!(wage.points, Some(10));
    }

    #[test]
    fn test_region_gain_from_toronto_and_gta() {
        let mut profile = Profile::new(Stream::JobOffer(JobOfferStream::InDemandSkills));
        profile.work_location = Some("toronto".to_string());
        assert_eq!(find(&generate_suggestions(&profile), "region").points, Some(10));

        profile.work_location = Some("gta".to_string());
        let region = generate_suggestions(&profile);
        let region = find(&region, "region");
        assert_eq!(region.points, Some(7));
        assert_eq!(region.title, "Work in Northern Ontario");
    }

    #[test]
    fn test_region_north_only_for_job_offers() {
        let mut job = Profile::new(Stream::JobOffer(JobOfferStream::ForeignWorker));
        job.work_location = Some("outside_gta".to_string());
        let suggestions = generate_suggestions(&job);
        let north = find(&suggestions, "region-north");
        assert_eq!(north.points, Some(2));
        assert_eq!(north.impact, Impact::Low);

        let mut grad = Profile::new(Stream::Graduate(GraduateStream::Masters));
        grad.study_location = Some("outside_gta".to_string());
        assert!(!ids(&generate_suggestions(&grad)).contains(&"region-north"));
    }

    #[test]
    fn test_wage_gap() {
        let mut profile = Profile::new(Stream::JobOffer(JobOfferStream::InternationalStudent));
        profile.wage_amount = Some(31.0);
        let suggestions = generate_suggestions(&profile);
        let wage = find(&suggestions, "wage");
        assert_eq!(wage.points, Some(3));
        assert_eq!(wage.impact, Impact::Medium);

        profile.wage_amount = Some(40.0);
        assert!(!ids(&generate_suggestions(&profile)).contains(&"wage"));
    }

    #[test]
    fn test_language_and_bilingual_together() {
        let mut profile = Profile::new(Stream::ExpressEntry(ExpressEntryStream::SkilledTrades));
        profile.clb_level = Some(8);

        let suggestions = generate_suggestions(&profile);
        assert_eq!(ids(&suggestions), vec!["language", "bilingual"]);
        assert_eq!(find(&suggestions, "language").points, Some(4));

        profile.clb_level = Some(9);
        profile.bilingual = Some(true);
        assert!(generate_suggestions(&profile).is_empty());
    }

    #[test]
    fn test_category_tiers() {
        let mut profile = Profile::new(Stream::JobOffer(JobOfferStream::ForeignWorker));
        profile.noc_broad_category = Some("business_admin".to_string());
        let suggestions = generate_suggestions(&profile);
        assert_eq!(find(&suggestions, "category-shift").points, Some(5));

        profile.noc_broad_category = Some("health_trades_stem".to_string());
        let suggestions = generate_suggestions(&profile);
        assert!(!ids(&suggestions).contains(&"category"));
        assert!(!ids(&suggestions).contains(&"category-shift"));
    }

    #[test]
    fn test_graduate_credential() {
        let mut profile = Profile::new(Stream::Graduate(GraduateStream::Phd));
        profile.canadian_credential_count = Some("1".to_string());
        assert!(ids(&generate_suggestions(&profile)).contains(&"credential"));

        profile.canadian_credential_count = Some("2+".to_string());
        assert!(!ids(&generate_suggestions(&profile)).contains(&"credential"));
    }

    #[test]
    fn test_optimal_graduate_profile_has_no_suggestions() {
        let mut profile = Profile::new(Stream::Graduate(GraduateStream::Masters));
        profile.study_location = Some("northern".to_string());
        profile.clb_level = Some(10);
        profile.bilingual = Some(true);
        profile.canadian_credential_count = Some("2+".to_string());

        assert!(generate_suggestions(&profile).is_empty());
    }

    #[test]
    fn test_all_deltas_positive() {
        for stream in Stream::ALL {
            let suggestions = generate_suggestions(&Profile::new(stream));
            for s in suggestions {
                assert!(s.points.unwrap_or(0) > 0, "{} has no gain", s.id);
            }
        }
    }
}

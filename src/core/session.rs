use crate::core::{
    crs::{refresh_crs, CrsInputs},
    evaluator::{Evaluation, Evaluator},
};
use crate::models::Profile;

/// A profile being edited, with its derived values kept current
///
/// Every edit goes through [`ProfileSession::update`], which replaces the
/// derived [`Evaluation`] as a whole; callers never observe a half-updated
/// result. While the CRS estimator is switched on, the stored CRS score is
/// re-estimated whenever one of the estimator's inputs changes, and only
/// written when the estimate differs from what is stored. A score typed in
/// by hand therefore survives edits to unrelated fields.
#[derive(Debug, Clone)]
pub struct ProfileSession {
    profile: Profile,
    evaluator: Evaluator,
    /// Estimator inputs at the last estimate; `None` while the estimator is off
    estimated_from: Option<CrsInputs>,
    evaluation: Evaluation,
}

impl ProfileSession {
    pub fn new(profile: Profile, evaluator: Evaluator) -> Self {
        let evaluation = evaluator.evaluate(&profile);
        Self {
            profile,
            evaluator,
            estimated_from: None,
            evaluation,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    pub fn estimator_enabled(&self) -> bool {
        self.estimated_from.is_some()
    }

    /// Apply an edit and re-derive everything downstream of it
    pub fn update<F>(&mut self, edit: F) -> &Evaluation
    where
        F: FnOnce(&mut Profile),
    {
        edit(&mut self.profile);

        if self.estimator_enabled() {
            let inputs = CrsInputs::from(&self.profile);
            if self.estimated_from.as_ref() != Some(&inputs) {
                self.apply_estimate();
                self.estimated_from = Some(inputs);
            }
        }

        self.rederive()
    }

    /// Record a CRS score entered by hand
    pub fn set_crs_score(&mut self, score: Option<u32>) -> &Evaluation {
        self.update(|profile| profile.crs_score = score)
    }

    /// Turn the CRS estimator on; estimates immediately
    pub fn enable_estimator(&mut self) -> &Evaluation {
        self.apply_estimate();
        self.estimated_from = Some(CrsInputs::from(&self.profile));
        self.rederive()
    }

    /// Turn the CRS estimator off, keeping the last stored score
    pub fn disable_estimator(&mut self) {
        self.estimated_from = None;
    }

    pub fn into_profile(self) -> Profile {
        self.profile
    }

    fn apply_estimate(&mut self) {
        if let Some(score) = refresh_crs(&self.profile) {
            tracing::debug!(
                "CRS estimate changed: {:?} -> {}",
                self.profile.crs_score,
                score
            );
            self.profile.crs_score = Some(score);
        }
    }

    fn rederive(&mut self) -> &Evaluation {
        self.evaluation = self.evaluator.evaluate(&self.profile);
        &self.evaluation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpressEntryStatus, ExpressEntryStream, Stream};

    fn hcp_session() -> ProfileSession {
        ProfileSession::new(
            Profile::new(Stream::ExpressEntry(
                ExpressEntryStream::HumanCapitalPriorities,
            )),
            Evaluator::default(),
        )
    }

    #[test]
    fn test_edits_rederive_without_estimator() {
        let mut session = hcp_session();
        assert_eq!(
            session.evaluation().status,
            ExpressEntryStatus::CrsMissing
        );

        session.update(|p| p.clb_level = Some(9));
        assert!(session.profile().crs_score.is_none());
        assert_eq!(session.evaluation().suggestions.len(), 1);
    }

    #[test]
    fn test_enable_estimator_writes_score() {
        let mut session = hcp_session();
        session.enable_estimator();

        assert!(session.estimator_enabled());
        assert_eq!(session.profile().crs_score, Some(110));
        assert_eq!(
            session.evaluation().status,
            ExpressEntryStatus::GeneralLow
        );
    }

    #[test]
    fn test_manual_score_survives_unrelated_edit() {
        let mut session = hcp_session();
        session.enable_estimator();

        session.set_crs_score(Some(480));
        session.update(|p| p.is_tech_occupation = Some(true));

        assert_eq!(session.profile().crs_score, Some(480));
        assert_eq!(session.evaluation().status, ExpressEntryStatus::TechHigh);
    }

    #[test]
    fn test_estimator_input_change_overwrites_manual_score() {
        let mut session = hcp_session();
        session.enable_estimator();
        session.set_crs_score(Some(480));

        session.update(|p| p.age = Some(27));
        assert_eq!(session.profile().crs_score, Some(110));

        session.update(|p| p.sibling_in_canada = Some(true));
        assert_eq!(session.profile().crs_score, Some(125));
    }

    #[test]
    fn test_disabled_estimator_leaves_score() {
        let mut session = hcp_session();
        session.enable_estimator();
        session.disable_estimator();

        session.update(|p| p.sibling_in_canada = Some(true));
        assert_eq!(session.profile().crs_score, Some(110));
        assert!(!session.estimator_enabled());
    }
}

//! Revenue-stream bottleneck analysis and optimization previews.

pub mod config;
mod domain;

pub use config::REVENUE_PROFILE;
pub use domain::{RevenueField, RevenueStream, StreamType};

use crate::engine::{
    cohort_for, Analysis, AnalysisSettings, CohortMembership, Recommendation, SimulationError,
    SimulationResult,
};

/// Looks up a stream by id within a portfolio.
pub fn find_stream<'a>(portfolio: &'a [RevenueStream], id: &str) -> Option<&'a RevenueStream> {
    portfolio.iter().find(|stream| stream.id == id)
}

/// Diagnoses `subject` against the rest of `portfolio`.
///
/// With [`CohortMembership::IncludeSubject`] the portfolio averages count the
/// subject itself, matching how portfolio averages were historically reported.
pub fn analyze(
    subject: &RevenueStream,
    portfolio: &[RevenueStream],
    membership: CohortMembership,
    settings: &AnalysisSettings,
) -> Analysis {
    let peers = cohort_for(&subject.id, portfolio, membership);
    REVENUE_PROFILE.analyze(subject, &peers, settings)
}

/// Previews the effect of `selected` on `subject`.
pub fn simulate(
    subject: &RevenueStream,
    selected: &[Recommendation],
) -> Result<SimulationResult<RevenueStream>, SimulationError> {
    REVENUE_PROFILE.simulate(subject, selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{select_by_id, DiagnosticKind, Severity};

    fn stream(id: &str, revenue: f64, growth: f64, margin: f64) -> RevenueStream {
        RevenueStream {
            id: id.to_string(),
            name: format!("Stream {id}"),
            stream_type: StreamType::OneTime,
            current_revenue: revenue,
            forecast_revenue: revenue * 1.1,
            growth: Some(growth),
            margin: Some(margin),
            customers: 100,
            avg_revenue_per_customer: Some(revenue / 100.0),
        }
    }

    fn ids(items: &[crate::engine::Diagnostic]) -> Vec<&'static str> {
        items.iter().map(|d| d.id).collect()
    }

    #[test]
    fn growth_far_below_peers_is_a_bottleneck_but_margin_near_peers_is_not() {
        let subject = stream("s", 2_000_000.0, 5.0, 18.0);
        let portfolio = vec![subject.clone(), stream("p", 2_000_000.0, 20.0, 20.0)];

        let analysis = analyze(
            &subject,
            &portfolio,
            CohortMembership::ExcludeSubject,
            &AnalysisSettings::default(),
        );

        assert_eq!(ids(&analysis.diagnostics), vec!["low-growth"]);
        assert_eq!(analysis.diagnostics[0].severity, Severity::High);
        assert_eq!(analysis.baseline.peer_count, 1);
    }

    #[test]
    fn self_inclusion_changes_the_baseline() {
        let subject = stream("s", 2_000_000.0, 8.0, 50.0);
        let portfolio = vec![subject.clone(), stream("p", 2_000_000.0, 20.0, 50.0)];

        let excluded = analyze(
            &subject,
            &portfolio,
            CohortMembership::ExcludeSubject,
            &AnalysisSettings::default(),
        );
        let included = analyze(
            &subject,
            &portfolio,
            CohortMembership::IncludeSubject,
            &AnalysisSettings::default(),
        );

        // 8 < 20 * 0.5, but 8 >= 14 * 0.5
        assert!(ids(&excluded.diagnostics).contains(&"low-growth"));
        assert!(!ids(&included.diagnostics).contains(&"low-growth"));
        assert_eq!(included.baseline.means.get("growth"), Some(&14.0));
    }

    #[test]
    fn strong_stream_gets_fallback_and_strengths() {
        let subject = stream("s", 3_000_000.0, 40.0, 80.0);
        let portfolio = vec![subject.clone(), stream("p", 1_000_000.0, 10.0, 40.0)];

        let analysis = analyze(
            &subject,
            &portfolio,
            CohortMembership::ExcludeSubject,
            &AnalysisSettings::default(),
        );

        assert_eq!(analysis.diagnostics.len(), 1);
        assert_eq!(analysis.diagnostics[0].kind, DiagnosticKind::Clear);
        assert_eq!(ids(&analysis.strengths), vec!["growth-leader", "healthy-margin"]);
        let rec_ids: Vec<_> = analysis.recommendations.iter().map(|r| r.id).collect();
        assert_eq!(rec_ids, vec!["customer-segmentation"]);
    }

    #[test]
    fn matching_a_strength_cutoff_exactly_is_not_a_strength() {
        // growth 12 == 10 * 1.2 and margin 40 == peer margin
        let subject = stream("s", 1_000_000.0, 12.0, 40.0);
        let portfolio = vec![subject.clone(), stream("p", 1_000_000.0, 10.0, 40.0)];

        let analysis = analyze(
            &subject,
            &portfolio,
            CohortMembership::ExcludeSubject,
            &AnalysisSettings::default(),
        );

        assert_eq!(ids(&analysis.strengths), vec!["steady-performer"]);
    }

    #[test]
    fn subscription_small_stream_recommendations_are_capped_in_order() {
        let mut subject = stream("s", 400_000.0, 2.0, 10.0);
        subject.stream_type = StreamType::Subscription;
        subject.customers = 200;
        subject.avg_revenue_per_customer = Some(1_000.0);
        let portfolio = vec![subject.clone(), stream("p", 5_000_000.0, 30.0, 60.0)];

        let analysis = analyze(
            &subject,
            &portfolio,
            CohortMembership::ExcludeSubject,
            &AnalysisSettings::default(),
        );

        let rec_ids: Vec<_> = analysis.recommendations.iter().map(|r| r.id).collect();
        assert_eq!(
            rec_ids,
            vec![
                "expansion-marketing",
                "cost-optimization",
                "pricing-optimization",
                "churn-reduction",
                "upsell-program",
            ]
        );
        let upsell = &analysis.recommendations[4];
        assert!((upsell.projected_impact - 30_000.0).abs() < 1e-6);
        assert!((analysis.recommendations[1].projected_impact - 1_200.0).abs() < 1e-6);
        assert!(ids(&analysis.diagnostics).contains(&"small-stream"));
    }

    #[test]
    fn ranking_reorders_only_when_requested() {
        let subject = stream("s", 400_000.0, 2.0, 10.0);
        let portfolio = vec![subject.clone(), stream("p", 5_000_000.0, 30.0, 60.0)];
        let settings = AnalysisSettings {
            recommendation_limit: 3,
            rank_by_impact: true,
        };

        let analysis = analyze(&subject, &portfolio, CohortMembership::ExcludeSubject, &settings);

        let impacts: Vec<_> = analysis
            .recommendations
            .iter()
            .map(|r| r.projected_impact)
            .collect();
        assert_eq!(analysis.recommendations.len(), 3);
        assert!(impacts.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(analysis.recommendations[0].id, "expansion-marketing");
    }

    #[test]
    fn simulation_applies_revenue_rules() {
        let subject = stream("s", 400_000.0, 2.0, 10.0);
        let portfolio = vec![subject.clone(), stream("p", 5_000_000.0, 30.0, 60.0)];
        let analysis = analyze(
            &subject,
            &portfolio,
            CohortMembership::ExcludeSubject,
            &AnalysisSettings::default(),
        );
        let selected = select_by_id(
            &analysis.recommendations,
            ["expansion-marketing", "cost-optimization"],
        )
        .expect("recommendations available");

        let result = simulate(&subject, &selected).expect("selection is not empty");

        let total = 60_000.0 + 1_200.0;
        assert!((result.total_impact - total).abs() < 1e-6);
        assert!((result.snapshot.current_revenue - (400_000.0 + total)).abs() < 1e-6);
        assert!((result.snapshot.forecast_revenue - (440_000.0 + total * 1.2)).abs() < 1e-6);
        assert_eq!(result.snapshot.growth, Some(6.0));
        assert_eq!(result.snapshot.margin, Some(13.0));
        assert_eq!(subject.current_revenue, 400_000.0);
    }
}

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use metric_advisor::config::{AppConfig, EngineConfig};
use metric_advisor::engine::{select_by_id, AnalysisSettings, CohortMembership, ImpactUnit};
use metric_advisor::error::AppError;
use metric_advisor::input::{load_contacts, load_funding_profile, load_revenue_streams};
use metric_advisor::profiles::engagement::{self, ContactEngagement, EngagementSummary};
use metric_advisor::profiles::funding::{self, CapitalGuidance, FundingOption, ReadinessLevel};
use metric_advisor::profiles::revenue;
use metric_advisor::report::AnalysisReport;
use metric_advisor::telemetry;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "metric-advisor",
    about = "Score, diagnose, and recommend improvements for contacts, revenue streams, and funding applicants",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Contact engagement scoring
    Engagement {
        #[command(subcommand)]
        command: EngagementCommand,
    },
    /// Revenue-stream bottleneck analysis
    Revenue {
        #[command(subcommand)]
        command: RevenueCommand,
    },
    /// Funding readiness assessment
    Funding {
        #[command(subcommand)]
        command: FundingCommand,
    },
}

#[derive(Subcommand, Debug)]
enum EngagementCommand {
    /// Score a single contact from its counters
    Score(EngagementScoreArgs),
    /// Score every contact in a CSV and compare each against the team
    Cohort(EngagementCohortArgs),
}

#[derive(Subcommand, Debug)]
enum RevenueCommand {
    /// Diagnose one stream against its portfolio and preview recommendations
    Analyze(RevenueAnalyzeArgs),
}

#[derive(Subcommand, Debug)]
enum FundingCommand {
    /// Assess a funding applicant profile
    Assess(FundingAssessArgs),
}

#[derive(Args, Debug, Default)]
struct OutputArgs {
    /// Evaluation date for the report (defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

impl OutputArgs {
    fn evaluated_on(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

#[derive(Args, Debug)]
struct EngagementScoreArgs {
    #[arg(long)]
    contacted: u32,
    #[arg(long)]
    responded: u32,
    #[arg(long)]
    followed_up: u32,
    /// Average response time in minutes
    #[arg(long)]
    response_minutes: f64,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct EngagementCohortArgs {
    /// Team engagement CSV export
    #[arg(long)]
    csv: PathBuf,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct RevenueAnalyzeArgs {
    /// Portfolio CSV, one row per revenue stream
    #[arg(long)]
    csv: PathBuf,
    /// Stream id to analyze
    #[arg(long)]
    stream: String,
    /// Recommendation ids to simulate, comma separated
    #[arg(long, value_delimiter = ',')]
    apply: Vec<String>,
    /// Override the configured recommendation cap (must be positive)
    #[arg(long)]
    limit: Option<NonZeroUsize>,
    /// Order recommendations by projected impact
    #[arg(long)]
    rank_by_impact: bool,
    /// Leave the analyzed stream out of the portfolio averages
    #[arg(long)]
    exclude_subject: bool,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct FundingAssessArgs {
    /// Applicant profile JSON
    #[arg(long)]
    profile: PathBuf,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Serialize)]
struct EngagementScoreOutput {
    evaluated_on: NaiveDate,
    tier_label: &'static str,
    #[serde(flatten)]
    summary: EngagementSummary,
}

#[derive(Debug, Serialize)]
struct CohortEntryOutput {
    name: String,
    tier_label: &'static str,
    summary: EngagementSummary,
    report: AnalysisReport,
}

#[derive(Debug, Serialize)]
struct FundingOutput {
    business_name: String,
    stage_label: &'static str,
    readiness: ReadinessLevel,
    readiness_label: &'static str,
    capital: CapitalGuidance,
    recommended_funding: Vec<FundingOption>,
    documents: Vec<&'static str>,
    report: AnalysisReport,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    info!(environment = ?config.environment, "metric advisor starting");

    match cli.command {
        Command::Engagement {
            command: EngagementCommand::Score(args),
        } => run_engagement_score(args),
        Command::Engagement {
            command: EngagementCommand::Cohort(args),
        } => run_engagement_cohort(args, &config.engine),
        Command::Revenue {
            command: RevenueCommand::Analyze(args),
        } => run_revenue_analyze(args, &config.engine),
        Command::Funding {
            command: FundingCommand::Assess(args),
        } => run_funding_assess(args, &config.engine),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_engagement_score(args: EngagementScoreArgs) -> Result<(), AppError> {
    let contact = ContactEngagement {
        contact_id: "cli".to_string(),
        name: String::new(),
        times_contacted: args.contacted,
        times_responded: args.responded,
        times_followed_up: args.followed_up,
        avg_response_time_minutes: args.response_minutes,
    };
    contact.validate()?;

    let summary = engagement::summarize(&contact);
    info!(score = summary.score.score, "engagement scored");

    let output = EngagementScoreOutput {
        evaluated_on: args.output.evaluated_on(),
        tier_label: summary.tier.label(),
        summary,
    };

    if args.output.json {
        return print_json(&output);
    }

    println!("Engagement score (evaluated {})", output.evaluated_on);
    render_engagement_summary(&output.summary);
    Ok(())
}

fn run_engagement_cohort(
    args: EngagementCohortArgs,
    engine: &EngineConfig,
) -> Result<(), AppError> {
    let team = load_contacts(&args.csv)?;
    let evaluated_on = args.output.evaluated_on();
    let settings = engine.to_settings();
    info!(contacts = team.len(), path = %args.csv.display(), "scoring engagement cohort");

    let entries: Vec<CohortEntryOutput> = team
        .iter()
        .map(|contact| {
            let summary = engagement::summarize(contact);
            let analysis = engagement::analyze(contact, &team, &settings);
            CohortEntryOutput {
                name: contact.name.clone(),
                tier_label: summary.tier.label(),
                summary,
                report: AnalysisReport::new("contact", &analysis, evaluated_on),
            }
        })
        .collect();

    if args.output.json {
        return print_json(&entries);
    }

    println!("Engagement cohort (evaluated {})", evaluated_on);
    println!("Contacts: {}", entries.len());
    for entry in &entries {
        let display_name = if entry.name.is_empty() {
            entry.summary.contact_id.as_str()
        } else {
            entry.name.as_str()
        };
        println!("\n{display_name}");
        render_engagement_summary(&entry.summary);
        render_findings(&entry.report);
    }
    Ok(())
}

fn revenue_settings(
    args: &RevenueAnalyzeArgs,
    engine: &EngineConfig,
) -> (AnalysisSettings, CohortMembership) {
    let mut settings = engine.to_settings();
    if let Some(limit) = args.limit {
        settings.recommendation_limit = limit.get();
    }
    if args.rank_by_impact {
        settings.rank_by_impact = true;
    }
    let membership = if args.exclude_subject {
        CohortMembership::ExcludeSubject
    } else {
        engine.cohort_membership
    };
    (settings, membership)
}

fn run_revenue_analyze(args: RevenueAnalyzeArgs, engine: &EngineConfig) -> Result<(), AppError> {
    let portfolio = load_revenue_streams(&args.csv)?;
    let subject = revenue::find_stream(&portfolio, &args.stream).ok_or_else(|| {
        AppError::UnknownEntity {
            kind: "revenue stream",
            id: args.stream.clone(),
        }
    })?;
    let (settings, membership) = revenue_settings(&args, engine);
    info!(
        stream = %subject.id,
        portfolio = portfolio.len(),
        ?membership,
        "analyzing revenue stream"
    );

    let analysis = revenue::analyze(subject, &portfolio, membership, &settings);
    let mut report = AnalysisReport::new("revenue stream", &analysis, args.output.evaluated_on());

    if !args.apply.is_empty() {
        let selected = select_by_id(&analysis.recommendations, &args.apply)?;
        let result = revenue::simulate(subject, &selected)?;
        report = report.with_simulation(&result);
    }
    info!(summary = %report.summary(), "revenue report ready");

    if args.output.json {
        return print_json(&report);
    }

    println!(
        "Revenue stream {} ({}) evaluated {}",
        subject.name,
        subject.stream_type.label(),
        report.evaluated_on
    );
    render_baseline(&report);
    render_findings(&report);
    render_recommendations(&report);
    render_simulation(&report);
    Ok(())
}

fn run_funding_assess(args: FundingAssessArgs, engine: &EngineConfig) -> Result<(), AppError> {
    let profile = load_funding_profile(&args.profile)?;
    let assessment = funding::assess(&profile, &engine.to_settings());
    info!(applicant = %profile.id, readiness = assessment.readiness.label(), "funding assessed");

    let output = FundingOutput {
        business_name: assessment.business_name.clone(),
        stage_label: assessment.stage.label(),
        readiness: assessment.readiness,
        readiness_label: assessment.readiness.label(),
        capital: assessment.capital.clone(),
        recommended_funding: assessment.recommended_funding.clone(),
        documents: assessment.documents.clone(),
        report: AnalysisReport::new(
            "funding applicant",
            &assessment.analysis,
            args.output.evaluated_on(),
        ),
    };
    info!(summary = %output.report.summary(), "funding report ready");

    if args.output.json {
        return print_json(&output);
    }

    println!(
        "Funding readiness for {} ({}) evaluated {}",
        output.business_name, output.stage_label, output.report.evaluated_on
    );
    println!("Readiness: {}", output.readiness_label);
    if output.capital.is_applicable() {
        println!(
            "Suggested raise: ${:.0} (range ${:.0} - ${:.0})",
            output.capital.target, output.capital.range_low, output.capital.range_high
        );
        println!("Typical uses");
        for use_of_funds in output.capital.uses {
            println!("- {use_of_funds}");
        }
    } else {
        println!("Suggested raise: not sized for this stage");
    }
    println!("\nRecommended funding");
    for option in &output.recommended_funding {
        println!(
            "- {} ({}, {}): ${:.0} - ${:.0}",
            option.name,
            option.funding_type.label(),
            option.provider,
            option.min_amount,
            option.max_amount
        );
    }
    println!("\nDocumentation checklist");
    for document in &output.documents {
        println!("- {document}");
    }
    render_findings(&output.report);
    render_recommendations(&output.report);
    Ok(())
}

fn render_engagement_summary(summary: &EngagementSummary) {
    println!(
        "Score: {:.1}/{:.0} ({})",
        summary.score.score,
        summary.score.scale,
        summary.tier.label()
    );
    println!(
        "Response rate: {:.2}%, follow-up rate: {:.2}%",
        summary.response_rate_pct, summary.follow_up_rate_pct
    );
}

fn render_baseline(report: &AnalysisReport) {
    if report.baseline.peer_count == 0 {
        println!("\nPortfolio baseline: no peers");
        return;
    }
    println!("\nPortfolio baseline ({} peers)", report.baseline.peer_count);
    for (field, mean) in &report.baseline.means {
        println!("- {field}: {mean:.2}");
    }
}

fn render_findings(report: &AnalysisReport) {
    println!("\nFindings");
    for finding in &report.diagnostics {
        println!(
            "- [{}] {}: {}",
            finding.severity_label, finding.title, finding.description
        );
    }
    println!("\nStrengths");
    for strength in &report.strengths {
        println!("- {}: {}", strength.title, strength.description);
    }
}

fn render_recommendations(report: &AnalysisReport) {
    if report.recommendations.is_empty() {
        println!("\nRecommendations: none");
        return;
    }
    println!("\nRecommendations");
    for rec in &report.recommendations {
        let impact = match rec.impact_unit {
            ImpactUnit::Currency => format!("+${:.0}", rec.projected_impact),
            ImpactUnit::Points => "qualitative".to_string(),
        };
        println!(
            "- {} | {} | {} | {} | {}",
            rec.id, rec.title, impact, rec.difficulty_label, rec.timeframe_label
        );
    }
    if report.total_projected_impact > 0.0 {
        println!("Total projected impact: ${:.0}", report.total_projected_impact);
    }
}

fn render_simulation(report: &AnalysisReport) {
    let Some(simulation) = &report.simulation else {
        return;
    };
    println!("\nSimulation ({})", simulation.applied.join(", "));
    for change in &simulation.changes {
        println!(
            "- {}: {:.2} -> {:.2}",
            change.label, change.before, change.after
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates() {
        let date = parse_date(" 2025-09-24 ").expect("valid date");
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 9, 24).expect("valid date"));
        assert!(parse_date("09/24/2025").is_err());
    }

    #[test]
    fn revenue_flags_override_engine_config() {
        let cli = Cli::try_parse_from([
            "metric-advisor",
            "revenue",
            "analyze",
            "--csv",
            "portfolio.csv",
            "--stream",
            "core",
            "--apply",
            "expansion-marketing,cost-optimization",
            "--limit",
            "3",
            "--exclude-subject",
            "--today",
            "2025-01-15",
        ])
        .expect("arguments parse");

        let Command::Revenue {
            command: RevenueCommand::Analyze(args),
        } = cli.command
        else {
            panic!("expected revenue analyze command");
        };

        assert_eq!(args.apply, vec!["expansion-marketing", "cost-optimization"]);
        assert_eq!(
            args.output.evaluated_on(),
            NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date")
        );

        let (settings, membership) = revenue_settings(&args, &EngineConfig::default());
        assert_eq!(settings.recommendation_limit, 3);
        assert!(!settings.rank_by_impact);
        assert_eq!(membership, CohortMembership::ExcludeSubject);
    }

    #[test]
    fn revenue_defaults_follow_engine_config() {
        let cli = Cli::try_parse_from([
            "metric-advisor",
            "revenue",
            "analyze",
            "--csv",
            "portfolio.csv",
            "--stream",
            "core",
        ])
        .expect("arguments parse");

        let Command::Revenue {
            command: RevenueCommand::Analyze(args),
        } = cli.command
        else {
            panic!("expected revenue analyze command");
        };
        let engine = EngineConfig {
            rank_by_impact: true,
            ..EngineConfig::default()
        };

        let (settings, membership) = revenue_settings(&args, &engine);
        assert!(args.apply.is_empty());
        assert_eq!(settings.recommendation_limit, 5);
        assert!(settings.rank_by_impact);
        assert_eq!(membership, CohortMembership::IncludeSubject);
    }

    #[test]
    fn zero_limit_is_rejected_like_the_env_setting() {
        let result = Cli::try_parse_from([
            "metric-advisor",
            "revenue",
            "analyze",
            "--csv",
            "portfolio.csv",
            "--stream",
            "core",
            "--limit",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn engagement_score_requires_every_counter() {
        let result = Cli::try_parse_from([
            "metric-advisor",
            "engagement",
            "score",
            "--contacted",
            "10",
            "--responded",
            "8",
        ]);
        assert!(result.is_err());
    }
}

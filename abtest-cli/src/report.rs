//! Rendering of analysis results

use abtest_core::{
    AnalysisReport, AssumptionCheck, AssumptionResult, ChosenTest, ComparisonOutcome, CoreError,
    DescriptiveSummary, ReportSink, Result, TestVerdict,
};
use colored::Colorize;
use comfy_table::Cell;

use crate::output::{
    format_p_value, format_stat, holds_badge, print_field, print_section, OutputFormat,
    OutputWriter, TableDisplay,
};

const SUMMARY_HEADERS: [&str; 12] = [
    "Group", "N", "Missing", "Mean", "Std", "Min", "5%", "50%", "95%", "99%", "Max", "95% CI (mean)",
];

impl TableDisplay for DescriptiveSummary {
    fn to_row(&self) -> Vec<Cell> {
        let q = |level: f64| self.quantile(level).map(format_stat).unwrap_or_else(|| "-".to_string());
        vec![
            Cell::new(&self.label),
            Cell::new(self.count),
            Cell::new(self.missing),
            Cell::new(format_stat(self.mean)),
            Cell::new(format_stat(self.std_dev)),
            Cell::new(format_stat(self.min)),
            Cell::new(q(0.05)),
            Cell::new(q(0.50)),
            Cell::new(q(0.95)),
            Cell::new(q(0.99)),
            Cell::new(format_stat(self.max)),
            Cell::new(
                self.mean_confidence_interval
                    .map(|(lo, hi)| format!("[{}, {}]", format_stat(lo), format_stat(hi)))
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]
    }

    fn display_compact(&self) {
        println!(
            "{}\tn={}\tmissing={}\tmean={}\tstd={}",
            self.label,
            self.count,
            self.missing,
            format_stat(self.mean),
            format_stat(self.std_dev)
        );
    }
}

/// Prints reports to stdout in the writer's format
pub struct ConsoleReporter<'a> {
    output: &'a OutputWriter,
}

impl<'a> ConsoleReporter<'a> {
    pub fn new(output: &'a OutputWriter) -> Self {
        Self { output }
    }

    fn render_table(&self, report: &AnalysisReport) -> anyhow::Result<()> {
        print_section(&format!("Descriptive statistics: {}", report.metric));
        self.output.write_list(&report.summaries, &SUMMARY_HEADERS)?;

        for summary in report.summaries.iter().filter(|s| s.missing > 0) {
            self.output.warning(&format!(
                "{} missing value(s) skipped in group '{}'",
                summary.missing, summary.label
            ));
        }

        let Some(outcome) = &report.outcome else {
            return Ok(());
        };

        print_section("Hypotheses");
        println!("  H0: μ({0}) = μ({1})  no difference in mean {2}", outcome.control_label, outcome.test_label, report.metric);
        println!("  H1: μ({0}) ≠ μ({1})  mean {2} differs", outcome.control_label, outcome.test_label, report.metric);

        print_section("Assumption checks");
        for result in outcome.assumptions() {
            println!(
                "  {} [{}] stat = {}, p-value = {} → {}",
                result.check.to_string().bold(),
                result.check.name(),
                format_stat(result.statistic),
                format_p_value(result.p_value),
                holds_badge(result.holds)
            );
            println!("    {}", interpret_assumption(result).dimmed());
        }
        if outcome.homogeneity.is_none() {
            println!("  {}", "variance homogeneity not checked (normality violated)".dimmed());
        }

        let verdict = &outcome.verdict;
        print_section("Hypothesis test");
        print_field("Chosen test", &format!("{} ({})", verdict.test.method_name(), verdict.test));
        print_field("Reason", &selection_reason(outcome));
        print_field("Statistic", &format_stat(verdict.statistic));
        if let Some(df) = verdict.degrees_of_freedom {
            print_field("Degrees of freedom", &format_stat(df));
        }
        print_field("p-value", &format_p_value(verdict.p_value));
        print_field("Alpha", &verdict.alpha.to_string());
        print_field("Mean difference", &format_stat(outcome.mean_difference));
        print_field("Effect size (Cohen's d)", &format_stat(outcome.effect_size));

        let conclusion = interpret_verdict(verdict, &outcome.control_label, &outcome.test_label);
        println!();
        if verdict.null_rejected {
            println!("{} {}", "●".yellow(), conclusion.bold());
        } else {
            println!("{} {}", "●".green(), conclusion.bold());
        }

        Ok(())
    }

    fn render_compact(&self, report: &AnalysisReport) {
        for summary in &report.summaries {
            summary.display_compact();
        }
        if let Some(outcome) = &report.outcome {
            let v = &outcome.verdict;
            println!(
                "verdict\t{}\tstat={}\tp={}\talpha={}\trejected={}",
                v.test,
                format_stat(v.statistic),
                format_p_value(v.p_value),
                v.alpha,
                v.null_rejected
            );
        }
    }
}

impl ReportSink for ConsoleReporter<'_> {
    fn report(&mut self, report: &AnalysisReport) -> Result<()> {
        match self.output.format() {
            OutputFormat::Table => self
                .render_table(report)
                .map_err(|e| CoreError::Serialization(e.to_string())),
            OutputFormat::Compact => {
                self.render_compact(report);
                Ok(())
            }
            OutputFormat::Json | OutputFormat::Yaml => self
                .output
                .write_serialized(report)
                .map_err(|e| CoreError::Serialization(e.to_string())),
        }
    }
}

/// One-line reading of an assumption check
pub fn interpret_assumption(result: &AssumptionResult) -> String {
    let subject = match &result.check {
        AssumptionCheck::Normality { label } => format!("the '{}' group is normally distributed", label),
        AssumptionCheck::VarianceHomogeneity => "the group variances are homogeneous".to_string(),
    };

    if result.holds {
        format!(
            "p = {} ≥ {}: H0 cannot be rejected; {}.",
            format_p_value(result.p_value),
            result.alpha,
            subject
        )
    } else {
        format!(
            "p = {} < {}: H0 rejected; it cannot be assumed that {}.",
            format_p_value(result.p_value),
            result.alpha,
            subject
        )
    }
}

/// Why the decision procedure picked the verdict's test
pub fn selection_reason(outcome: &ComparisonOutcome) -> String {
    match outcome.verdict.test {
        ChosenTest::ParametricEqualVar => {
            "both groups are normal and variances are homogeneous".to_string()
        }
        ChosenTest::ParametricUnequalVar => {
            "both groups are normal but variances differ".to_string()
        }
        ChosenTest::NonParametric => {
            let failing: Vec<&str> = outcome
                .normality
                .iter()
                .filter(|r| !r.holds)
                .filter_map(|r| match &r.check {
                    AssumptionCheck::Normality { label } => Some(label.as_str()),
                    AssumptionCheck::VarianceHomogeneity => None,
                })
                .collect();
            format!("normality violated for: {}", failing.join(", "))
        }
    }
}

/// Final conclusion of the comparison
pub fn interpret_verdict(verdict: &TestVerdict, control: &str, test: &str) -> String {
    let measure = if verdict.test.is_parametric() { "means" } else { "distributions" };

    if verdict.null_rejected {
        format!(
            "H0 rejected (p = {} < {}): there is a statistically significant difference between the {} of '{}' and '{}'.",
            format_p_value(verdict.p_value),
            verdict.alpha,
            measure,
            control,
            test
        )
    } else {
        format!(
            "H0 cannot be rejected (p = {} ≥ {}): there is no statistically significant difference between the {} of '{}' and '{}'.",
            format_p_value(verdict.p_value),
            verdict.alpha,
            measure,
            control,
            test
        )
    }
}

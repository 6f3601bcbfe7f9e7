use std::process::ExitCode;

use crate::config::{Config, OutputMode, PerfDataStyle};
use crate::error::CheckError;
use crate::evaluator::{Evaluation, Verdict, evaluate};
use crate::models::Station;
use crate::utils::convert_to_nagios_variable;

/// Monitoring plugin status, mapped 1:1 onto the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok = 0,
    Warning = 1,
    Critical = 2,
}

impl Status {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> ExitCode {
        ExitCode::from(status.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub display: String,
    pub performance: String,
    pub status: Status,
}

impl Report {
    pub fn build(config: &Config, station: &Station) -> Report {
        let evaluations = evaluate(&station.prices, &config.alarms);

        let status = if evaluations.iter().any(|e| e.verdict.is_alarm()) {
            Status::Warning
        } else {
            Status::Ok
        };

        let mut display = render_display(&evaluations, config.favorite.as_deref(), config.output_mode);
        if config.hyperlink {
            display = format!(
                "<a href=\"{}\" target=\"_blank\">{}</a>",
                config.station_url(),
                display
            );
        }

        Report {
            display,
            performance: render_performance(station, config.perfdata_style),
            status,
        }
    }

    /// `<display>|<performance>`, the line the monitoring system parses.
    pub fn line(&self) -> String {
        format!("{}|{}", self.display, self.performance)
    }
}

pub fn critical_line(err: &CheckError) -> String {
    format!("CRITICAL - {}", err)
}

fn render_display(evaluations: &[Evaluation], favorite: Option<&str>, mode: OutputMode) -> String {
    let mut entries = Vec::new();

    for evaluation in evaluations {
        let Evaluation { fuel, price, verdict } = evaluation;
        match verdict {
            Verdict::LimitReached { limit } => {
                entries.push(format!("{}: limit of {} E/l reached", fuel, limit));
            }
            Verdict::BelowLimit { limit, delta } => {
                entries.push(format!(
                    "{}: {} E/l is {} E/l below limit of {} E/l",
                    fuel, price, delta, limit
                ));
            }
            Verdict::NotAlarmed => {
                if favorite.is_none_or(|prefix| fuel.starts_with(prefix)) {
                    entries.push(format!("{}: {} E/l", fuel, price));
                }
            }
        }
    }

    match mode {
        OutputMode::SingleLine => entries.join(" "),
        OutputMode::MultiLine => entries.iter().map(|e| format!("{}\n", e)).collect(),
    }
}

fn render_performance(station: &Station, style: PerfDataStyle) -> String {
    let prefix = match style {
        PerfDataStyle::Long => format!("{}_", convert_to_nagios_variable(&station.name)),
        PerfDataStyle::Short => String::new(),
    };

    station
        .prices
        .iter()
        .map(|(fuel, price)| format!("{}{}={} ", prefix, convert_to_nagios_variable(fuel), price))
        .collect()
}

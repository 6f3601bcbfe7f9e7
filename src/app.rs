use std::io::Write;

use crate::Cli;
use crate::config::Config;
use crate::error::{CheckError, Result};
use crate::extractor::extract_station;
use crate::fetcher::fetch_station_page;
use crate::report::{Report, Status, critical_line};

use log::{debug, error, info};

/// Run one check and write the plugin output to `out`. The returned status
/// is the process exit code.
pub async fn run_check(cli: &Cli, out: &mut impl Write) -> Status {
    // 1) Resolve configuration
    let config = match Config::resolve(cli) {
        Ok(config) => config,
        Err(e) => return critical(&e, out),
    };
    debug!("Configuration resolved for station {}", config.station);

    if config.debug {
        emit(out, &config.describe());
    }

    // 2) Fetch, extract, evaluate
    match check_station(&config).await {
        Ok(report) => {
            info!("Station {} checked: {:?}", config.station, report.status);
            emit(out, &report.line());
            report.status
        }
        Err(e) => critical(&e, out),
    }
}

pub async fn check_station(config: &Config) -> Result<Report> {
    let body = fetch_station_page(config).await?;
    let station = extract_station(&body)?;
    debug!(
        "Extracted {} ({}) with {} fuel types",
        station.name,
        station.street,
        station.prices.len()
    );

    Ok(Report::build(config, &station))
}

pub fn critical(err: &CheckError, out: &mut impl Write) -> Status {
    error!("{}", err);
    emit(out, &critical_line(err));
    Status::Critical
}

fn emit(out: &mut impl Write, line: &str) {
    if let Err(e) = writeln!(out, "{}", line) {
        error!("Could not write output: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfig;
    use crate::error::Field;
    use clap::Parser;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"<div>
<span class="strong-title" itemprop="name">Star Tankstelle</span>
<span itemprop="streetAddress">Am Markt 3</span>
</div>
<div class="price-type-name">Diesel</div>
<div class="price-field">
  <span>aktuell</span>
  <span id="current-price-1">1.30</span>
</div>
<div class="price-type-name">Super E10</div>
<div class="price-field">
  <span>aktuell</span>
  <span id="current-price-2">1.749</span>
</div>
"#;

    async fn serve(status: u16, body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tankstelle_details/815"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    fn config_for(server: &MockServer, args: &[&str]) -> Config {
        let mut argv = vec!["check_fuel_price", "--station", "815"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        let file = FileConfig {
            base_url: Some(server.uri()),
            ..FileConfig::default()
        };
        Config::from_parts(&cli, file).unwrap()
    }

    #[tokio::test]
    async fn test_check_station_ok() {
        let server = serve(200, PAGE).await;
        let config = config_for(&server, &["--outputtype", "singleline"]);

        let report = check_station(&config).await.unwrap();
        assert_eq!(report.status, Status::Ok);
        assert_eq!(
            report.line(),
            "Diesel: 1.30 E/l Super E10: 1.75 E/l|Star_Tankstelle_Diesel=1.30 Star_Tankstelle_Super_E10=1.75 "
        );
    }

    #[tokio::test]
    async fn test_check_station_alarm() {
        let server = serve(200, PAGE).await;
        let config = config_for(&server, &["--alarm", "Diesel: 1.30", "--favorite", "Super"]);

        let report = check_station(&config).await.unwrap();
        assert_eq!(report.status, Status::Warning);
        assert_eq!(
            report.display,
            "Diesel: limit of 1.30 E/l reached\nSuper E10: 1.75 E/l\n"
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_names_station() {
        let server = serve(404, "not here").await;
        let config = config_for(&server, &[]);

        let err = check_station(&config).await.unwrap_err();
        assert!(matches!(err, CheckError::FetchFailure { station: 815, .. }));
        assert!(critical_line(&err).starts_with("CRITICAL - "));
        assert!(critical_line(&err).contains("815"));
    }

    #[tokio::test]
    async fn test_missing_fields_are_distinct() {
        let server = serve(200, &PAGE.replace("itemprop=\"name\"", "")).await;
        let config = config_for(&server, &[]);
        let name_err = check_station(&config).await.unwrap_err();
        assert!(matches!(name_err, CheckError::MissingField(Field::StationName)));

        let server = serve(200, &PAGE.replace("itemprop=\"streetAddress\"", "")).await;
        let config = config_for(&server, &[]);
        let street_err = check_station(&config).await.unwrap_err();
        assert!(matches!(street_err, CheckError::MissingField(Field::Street)));

        assert_ne!(critical_line(&name_err), critical_line(&street_err));
    }

    async fn run(server: &MockServer, args: &[&str]) -> (Status, String) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url: \"{}\"", server.uri()).unwrap();

        let config_path = file.path().to_str().unwrap().to_string();
        let mut argv = vec!["check_fuel_price", "--station", "815", "--config", config_path.as_str()];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();

        let mut out = Vec::new();
        let status = run_check(&cli, &mut out).await;
        (status, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_run_check_ok() {
        let server = serve(200, PAGE).await;
        let (status, out) = run(&server, &["--outputtype", "singleline", "--perfdatastyle", "short"]).await;

        assert_eq!(status, Status::Ok);
        assert_eq!(status.code(), 0);
        assert_eq!(out, "Diesel: 1.30 E/l Super E10: 1.75 E/l|Diesel=1.30 Super_E10=1.75 \n");
    }

    #[tokio::test]
    async fn test_run_check_warning_exit_code() {
        let server = serve(200, PAGE).await;
        let (status, out) = run(&server, &["--alarm", "Diesel: 1.35"]).await;

        assert_eq!(status.code(), 1);
        assert!(out.starts_with("Diesel: 1.30 E/l is 0.05 E/l below limit of 1.35 E/l\n"), "{out}");
    }

    #[tokio::test]
    async fn test_run_check_debug_echoes_config() {
        let server = serve(200, PAGE).await;
        let (status, out) = run(&server, &["--debug", "--alarm", "Diesel: 1.20"]).await;

        assert_eq!(status, Status::Ok);
        assert!(out.starts_with("station: 815\nalarms: Diesel: 1.20\n"), "{out}");
        assert!(out.contains(&format!("url: {}/tankstelle_details/815", server.uri())));
        assert!(out.contains("|Star_Tankstelle_Diesel=1.30 "));
    }

    #[tokio::test]
    async fn test_run_check_fetch_failure_prints_only_critical() {
        let server = serve(500, "boom").await;
        let (status, out) = run(&server, &[]).await;

        assert_eq!(status, Status::Critical);
        assert_eq!(status.code(), 2);
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("CRITICAL - could not fetch station 815"), "{out}");
        assert!(!out.contains('|'));
    }

    #[tokio::test]
    async fn test_run_check_invalid_station() {
        let cli = Cli::try_parse_from(["check_fuel_price", "--station", "0"]).unwrap();
        let mut out = Vec::new();
        let status = run_check(&cli, &mut out).await;

        assert_eq!(status, Status::Critical);
        assert!(String::from_utf8(out).unwrap().starts_with("CRITICAL - invalid station id"));
    }
}

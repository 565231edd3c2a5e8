//! Data source: read the plant table from CSV, on disk or over HTTP.
//!
//! Column names follow the published power-facility sheet
//! (`Status`, `Type`, `Country/area`, `Region`, `Start year`, ...). Extra
//! columns are ignored; a missing required column is a hard error.
//!
//! Typical usage:
//! ```no_run
//! # use ppcap::source;
//! let dataset = source::load_csv("plants.csv")?;
//! println!("{} plants", dataset.len());
//! # Ok::<(), ppcap::LoadError>(())
//! ```

use crate::error::LoadError;
use crate::normalize::{Dataset, RawTable};
use log::{info, warn};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Read a header-first CSV into a raw string table.
pub fn read_raw<R: Read>(reader: R) -> Result<RawTable, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawTable::new(columns, rows))
}

/// Read and normalize a CSV table.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    Dataset::from_raw(&read_raw(reader)?)
}

/// Read and normalize a CSV file.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    info!("loading plant table from {}", path.display());
    let file = std::fs::File::open(path)?;
    read_csv(file)
}

/// Blocking HTTP client for remote CSV exports of the plant table.
#[derive(Debug, Clone)]
pub struct Client {
    http: HttpClient,
}

impl Client {
    pub fn new() -> Result<Self, LoadError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(concat!("ppcap/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LoadError::Http(e.to_string()))?;
        Ok(Self { http })
    }

    /// Download `url` and normalize it as a CSV table.
    ///
    /// Server errors and transport failures are retried three times with a short backoff.
    pub fn fetch_csv(&self, url: &str) -> Result<Dataset, LoadError> {
        info!("downloading plant table from {url}");
        let body = self.get_bytes(url)?;
        read_csv(body.as_slice())
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        let mut last_err = String::from("no attempt made");
        for backoff_ms in [100u64, 300, 700] {
            match self.http.get(url).send() {
                Ok(r) if r.status().is_success() => {
                    let bytes = r.bytes().map_err(|e| LoadError::Http(e.to_string()))?;
                    return Ok(bytes.to_vec());
                }
                Ok(r) if r.status().is_server_error() => {
                    last_err = format!("HTTP {}", r.status());
                }
                Ok(r) => {
                    return Err(LoadError::Http(format!(
                        "request failed with HTTP {}",
                        r.status()
                    )));
                }
                Err(e) => last_err = e.to_string(),
            }
            warn!("GET {url} failed ({last_err}), retrying in {backoff_ms} ms");
            std::thread::sleep(Duration::from_millis(backoff_ms));
        }
        Err(LoadError::Http(format!("GET {url}: {last_err}")))
    }
}

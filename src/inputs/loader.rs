//! Load report requests from JSON documents and CSV batches

use csv::Reader;
use log::debug;
use std::fs;
use std::path::Path;

use super::request::ReportRequest;
use crate::error::{ProjectorError, Result};

/// Load a single request from a JSON file
pub fn load_request<P: AsRef<Path>>(path: P) -> Result<ReportRequest> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ProjectorError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let request = serde_json::from_str(&contents)?;
    debug!("loaded report request from {}", path.display());
    Ok(request)
}

/// Load one request per CSV row. Column headers use the same camelCase
/// names as the JSON request; absent columns take their defaults.
pub fn load_requests_csv<P: AsRef<Path>>(path: P) -> Result<Vec<ReportRequest>> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|source| ProjectorError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let requests = load_requests_from_reader(file)?;
    debug!("loaded {} requests from {}", requests.len(), path.display());
    Ok(requests)
}

/// Load requests from any CSV reader (string buffer, stdin, network stream)
pub fn load_requests_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<ReportRequest>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut requests = Vec::new();

    for result in csv_reader.deserialize() {
        let row: ReportRequest = result?;
        requests.push(row);
    }

    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_requests_from_csv_reader() {
        let data = "propertyStreet,purchasePrice,numUnits,avgMonthlyRentPerUnit,vacancyRate,usePercentageMode\n\
                    1 Oak Ave,500000,6,1100,5,true\n\
                    9 Pine Rd,\"$750,000\",8,,bad,false\n";
        let requests = load_requests_from_reader(data.as_bytes()).unwrap();
        assert_eq!(requests.len(), 2);

        let first = requests[0].clone().into_input();
        assert_eq!(first.params.income.units, 6);
        assert_eq!(first.params.income.vacancy_rate_pct, 5.0);

        let second = requests[1].clone().into_input();
        assert_eq!(second.params.acquisition.purchase_price, 750_000.0);
        assert_eq!(second.params.income.avg_monthly_rent_per_unit, 0.0);
        assert_eq!(second.params.income.vacancy_rate_pct, 10.0);
        assert_eq!(second.address.street.as_deref(), Some("9 Pine Rd"));
    }

    #[test]
    fn test_load_request_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"purchasePrice": 250000, "numUnits": 4}}"#).unwrap();

        let request = load_request(file.path()).unwrap();
        assert_eq!(request.purchase_price, Some(250_000.0));
        assert_eq!(request.num_units, Some(4.0));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = load_request("does/not/exist.json").unwrap_err();
        assert!(matches!(err, ProjectorError::Read { .. }));
    }
}

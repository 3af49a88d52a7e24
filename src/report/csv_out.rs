//! CSV export of the report table
//!
//! Unlike the printed report, values keep their sign so the file can be
//! summed or charted directly. Amounts are rounded to whole dollars.

use csv::Writer;

use super::layout::ReportLayout;
use crate::error::{ProjectorError, Result};

pub fn render_csv(layout: &ReportLayout) -> Result<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());

    let mut header = vec!["Line Item".to_string()];
    header.extend(
        layout
            .columns
            .iter()
            .map(|c| format!("Year {} ({})", c.year, c.calendar_year)),
    );
    writer.write_record(&header)?;

    for row in &layout.rows {
        let mut record = Vec::with_capacity(row.values.len() + 1);
        record.push(row.label.clone());
        // `+ 0.0` turns -0 into 0
        record.extend(row.values.iter().map(|v| format!("{:.0}", v.round() + 0.0)));
        writer.write_record(&record)?;
    }

    writer.flush().map_err(|e| ProjectorError::Csv(e.into()))?;
    writer
        .into_inner()
        .map_err(|e| ProjectorError::Csv(e.into_error().into()))
}
